//! Bowsync Processing Core
//!
//! Turns tracker and pitch-estimator tables into bowing annotations:
//! - **Direction Extraction:** Principal-axis projection, sign classification, majority smoothing
//! - **Synchronization:** Offset correction, silence-run promotion, segment matching
//! - **Overlay Cues:** Per-frame arrow/marker plan for a video renderer
//!
//! This crate is pure computation: no I/O, no model inference.
//! All inputs are data; all outputs are data.

pub mod direction;
pub mod overlay;
pub mod partition;
pub mod pca;
pub mod smoothing;
pub mod sync;

pub use direction::DirectionExtractor;
pub use overlay::CuePlan;
pub use partition::SegmentPartition;
pub use sync::StreamSynchronizer;
