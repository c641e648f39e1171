//! Classify pitch samples into note events.

use std::path::PathBuf;

use bowsync_common::config::SilenceConfig;
use bowsync_session_model::table::write_events;

use crate::pipeline;

pub fn run(
    pitch: PathBuf,
    audio: Option<PathBuf>,
    output: PathBuf,
    metadata: Option<PathBuf>,
    config: &SilenceConfig,
) -> anyhow::Result<()> {
    println!("Classifying note events from: {}", pitch.display());

    let report = pipeline::classify_events(&pitch, audio.as_deref(), metadata.as_deref(), config)
        .map_err(|e| anyhow::anyhow!("Failed to classify events: {e}"))?;

    println!("  Strategy: {:?}", config.strategy);
    println!("  Events: {}", report.events.len());
    println!("  Silent: {}", report.silent_events());
    if report.out_of_range > 0 {
        let (lo, hi) = config.instrument.range_hz();
        println!(
            "  Outside {lo}-{hi} Hz: {}{}",
            report.out_of_range,
            if config.restrict_to_range {
                " (left unnamed)"
            } else {
                ""
            }
        );
    }
    if let Some((samples, flags)) = report.truncated {
        println!("  [WARN] {samples} pitch samples vs {flags} silence flags; truncated");
    }

    write_events(&output, &report.events)?;
    println!("  Events saved to: {}", output.display());

    Ok(())
}
