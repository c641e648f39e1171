pub mod batch;
pub mod config;
pub mod cues;
pub mod direction;
pub mod events;
pub mod sync;
