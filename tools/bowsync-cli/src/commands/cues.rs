//! Plan overlay cues from an annotation table.

use std::path::PathBuf;

use bowsync_common::config::OverlayConfig;
use bowsync_processing_core::overlay::RenderedCue;
use bowsync_processing_core::CuePlan;
use bowsync_session_model::table::read_annotations;
use serde::Serialize;

/// Cue plan file contents.
#[derive(Serialize)]
struct CuePlanFile {
    width: u32,
    height: u32,
    cues: Vec<RenderedCue>,
}

pub fn run(
    annotations: PathBuf,
    width: u32,
    height: u32,
    output: PathBuf,
    config: &OverlayConfig,
) -> anyhow::Result<()> {
    println!("Planning overlay cues from: {}", annotations.display());

    let annotations = read_annotations(&annotations)?;
    let plan = CuePlan::from_annotations(&annotations);
    println!("  Annotations: {}", annotations.len());
    println!("  Frames with a cue: {}", plan.len());

    let file = CuePlanFile {
        width,
        height,
        cues: plan.render(width, height, config),
    };
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&output, serde_json::to_string_pretty(&file)?)?;
    println!("  Cue plan saved to: {}", output.display());

    Ok(())
}
