//! Bowsync Audio Analysis
//!
//! Offline analysis of the performance audio track:
//! - **Ingest:** WAV decoding and mono downmix
//! - **Silence Detection:** Energy-based and confidence-based strategies
//! - **Notes:** Frequency to note-name conversion
//! - **Classification:** Silence / change / sustain labelling of pitch samples

pub mod classifier;
pub mod ingest;
pub mod notes;
pub mod silence;

pub use classifier::*;
pub use ingest::*;
pub use silence::*;
