//! Classify a keypoint trajectory into bow direction segments.

use std::path::PathBuf;

use bowsync_common::config::DirectionConfig;
use bowsync_session_model::direction::Direction;
use bowsync_session_model::table::write_directions;

use crate::pipeline;

pub fn run(keypoints: PathBuf, output: PathBuf, config: &DirectionConfig) -> anyhow::Result<()> {
    println!("Extracting bow directions from: {}", keypoints.display());

    let segments = pipeline::extract_directions(&keypoints, config)
        .map_err(|e| anyhow::anyhow!("Failed to extract directions: {e}"))?;

    let count = |d: Direction| segments.iter().filter(|s| s.direction == d).count();
    println!("  Keypoint index: {}", config.keypoint_index);
    println!("  Segments: {}", segments.len());
    println!(
        "  Up: {}  Down: {}  Stationary: {}",
        count(Direction::Up),
        count(Direction::Down),
        count(Direction::Stationary)
    );

    write_directions(&output, &segments)?;
    println!("  Directions saved to: {}", output.display());

    Ok(())
}
