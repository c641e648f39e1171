//! Bowsync Common Utilities
//!
//! Shared infrastructure for all bowsync crates:
//! - Error taxonomy and result aliases
//! - Frame clock for mapping between seconds and video frames
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
