//! Bowsync Session Model
//!
//! Defines the data contracts exchanged between analysis stages:
//! - **Trajectory:** Per-frame 2D keypoint positions from a tracker
//! - **Direction:** Bowing direction segments between consecutive frames
//! - **Pitch:** Per-time-step frequency and voicing confidence
//! - **Events:** Inferred note events and the final fused annotations
//! - **Table:** Flat delimited text I/O for every contract above
//!
//! Frame numbers are video frames; times are seconds from the start of
//! the audio.

pub mod direction;
pub mod event;
pub mod metadata;
pub mod pitch;
pub mod table;
pub mod trajectory;

pub use direction::*;
pub use event::*;
pub use metadata::*;
pub use pitch::*;
pub use table::*;
pub use trajectory::*;
