//! Fuse direction segments and note events into annotations.

use std::path::PathBuf;

use bowsync_common::config::SyncConfig;
use bowsync_session_model::table::{read_directions, read_events, write_annotations};

use crate::pipeline;

pub fn run(
    directions: PathBuf,
    events: PathBuf,
    output: PathBuf,
    config: &SyncConfig,
) -> anyhow::Result<()> {
    println!(
        "Synchronizing {} with {}",
        directions.display(),
        events.display()
    );

    let segments = read_directions(&directions)?;
    let events = read_events(&events)?;
    println!("  Segments: {}  Events: {}", segments.len(), events.len());

    let outcome = pipeline::synchronize(&segments, &events, config)
        .map_err(|e| anyhow::anyhow!("Failed to synchronize: {e}"))?;

    println!("  Frame offset: {}", config.frame_offset);
    println!("  Annotations: {}", outcome.annotations.len());
    println!("  Promoted silences: {}", outcome.promoted_silences);
    if outcome.unmatched_events > 0 {
        println!("  Unmatched events: {}", outcome.unmatched_events);
    }
    if let Some(err) = outcome.alignment_error().filter(|_| !events.is_empty()) {
        println!("  [WARN] {err}");
    }

    write_annotations(&output, &outcome.annotations)?;
    println!("  Annotations saved to: {}", output.display());

    Ok(())
}
