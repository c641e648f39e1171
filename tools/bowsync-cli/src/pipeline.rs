//! Per-unit analysis pipeline shared by the single-step commands and batch mode.

use std::path::{Path, PathBuf};

use bowsync_audio_analysis::{detector_for, load_wav, ClassificationReport, EventClassifier};
use bowsync_common::config::{AppConfig, DirectionConfig, SilenceConfig, SyncConfig};
use bowsync_common::error::{BowsyncError, BowsyncResult};
use bowsync_processing_core::sync::SyncOutcome;
use bowsync_processing_core::{DirectionExtractor, StreamSynchronizer};
use bowsync_session_model::direction::DirectionSegment;
use bowsync_session_model::event::InferredNoteEvent;
use bowsync_session_model::metadata::SessionMetadata;
use bowsync_session_model::pitch::samples_from_rows;
use bowsync_session_model::table;
use bowsync_session_model::trajectory::Trajectory;
use serde::Serialize;

pub const KEYPOINTS_FILE: &str = "keypoints.csv";
pub const PITCH_FILE: &str = "pitch.csv";
pub const AUDIO_FILE: &str = "audio.wav";
pub const METADATA_FILE: &str = "metadata.json";
pub const DIRECTIONS_FILE: &str = "directions.csv";
pub const EVENTS_FILE: &str = "events.csv";
pub const ANNOTATED_FILE: &str = "annotated.csv";

/// Input files of one performance unit.
#[derive(Debug, Clone)]
pub struct UnitInputs {
    pub name: String,
    pub dir: PathBuf,
    pub keypoints: PathBuf,
    pub pitch: PathBuf,
    pub audio: PathBuf,
    pub metadata: Option<PathBuf>,
}

impl UnitInputs {
    /// Locate a unit's inputs, or list the required files that are missing.
    pub fn discover(dir: &Path) -> Result<Self, Vec<&'static str>> {
        let keypoints = dir.join(KEYPOINTS_FILE);
        let pitch = dir.join(PITCH_FILE);
        let audio = dir.join(AUDIO_FILE);

        let missing: Vec<&'static str> = [
            (KEYPOINTS_FILE, &keypoints),
            (PITCH_FILE, &pitch),
            (AUDIO_FILE, &audio),
        ]
        .into_iter()
        .filter(|(_, path)| !path.is_file())
        .map(|(name, _)| name)
        .collect();
        if !missing.is_empty() {
            return Err(missing);
        }

        let metadata = Some(dir.join(METADATA_FILE)).filter(|p| p.is_file());
        Ok(Self {
            name: dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| dir.display().to_string()),
            dir: dir.to_path_buf(),
            keypoints,
            pitch,
            audio,
            metadata,
        })
    }
}

/// Counts reported for a processed unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UnitSummary {
    pub segments: usize,
    pub events: usize,
    pub annotations: usize,
    pub unmatched_events: usize,
    pub promoted_silences: usize,
    /// `(samples, flags)` when the silence flags had to be truncated.
    pub truncated: Option<(usize, usize)>,
    /// Set when the two streams share no frame range.
    pub alignment: Option<String>,
}

/// Keypoint table to direction segments.
pub fn extract_directions(
    keypoints: &Path,
    config: &DirectionConfig,
) -> BowsyncResult<Vec<DirectionSegment>> {
    let rows = table::read_keypoints(keypoints)?;
    let trajectory = Trajectory::from_keypoints(&rows, config.keypoint_index);
    tracing::debug!(
        path = %keypoints.display(),
        rows = rows.len(),
        samples = trajectory.len(),
        keypoint_index = config.keypoint_index,
        "Loaded trajectory"
    );
    DirectionExtractor::new(config.clone()).extract(&trajectory)
}

/// Pitch table (plus audio and optional metadata) to note events.
pub fn classify_events(
    pitch: &Path,
    audio: Option<&Path>,
    metadata: Option<&Path>,
    config: &SilenceConfig,
) -> BowsyncResult<ClassificationReport> {
    let rows = table::read_pitch(pitch)?;
    let clock = metadata
        .map(|path| SessionMetadata::load(path)?.clock())
        .transpose()?;
    let samples = samples_from_rows(&rows, clock.as_ref())?;

    if let Some(clock) = &clock {
        tracing::debug!(fps = clock.fps(), "Calibrated frame clock from metadata");
    }

    // Audio is validated even when the chosen strategy does not read it.
    let audio = audio.map(load_wav).transpose()?;
    if audio.as_ref().is_some_and(|a| a.is_empty()) {
        return Err(BowsyncError::empty_input("audio contains no samples"));
    }
    let detector = detector_for(config, audio.as_ref())?;
    Ok(EventClassifier::new(config.clone()).classify(&samples, detector.as_ref()))
}

/// Fuse the two streams.
pub fn synchronize(
    segments: &[DirectionSegment],
    events: &[InferredNoteEvent],
    config: &SyncConfig,
) -> BowsyncResult<SyncOutcome> {
    StreamSynchronizer::new(config.clone()).synchronize(segments, events)
}

/// Run every stage for one unit and write its three tables next to its inputs.
pub fn run_unit(inputs: &UnitInputs, config: &AppConfig) -> BowsyncResult<UnitSummary> {
    let segments = extract_directions(&inputs.keypoints, &config.direction)?;
    table::write_directions(&inputs.dir.join(DIRECTIONS_FILE), &segments)?;

    let report = classify_events(
        &inputs.pitch,
        Some(&inputs.audio),
        inputs.metadata.as_deref(),
        &config.silence,
    )?;
    table::write_events(&inputs.dir.join(EVENTS_FILE), &report.events)?;

    let outcome = synchronize(&segments, &report.events, &config.sync)?;
    table::write_annotations(&inputs.dir.join(ANNOTATED_FILE), &outcome.annotations)?;

    let alignment = outcome
        .alignment_error()
        .filter(|_| !report.events.is_empty())
        .map(|e| e.to_string());

    tracing::info!(
        unit = %inputs.name,
        segments = segments.len(),
        events = report.events.len(),
        annotations = outcome.annotations.len(),
        "Unit processed"
    );

    Ok(UnitSummary {
        segments: segments.len(),
        events: report.events.len(),
        annotations: outcome.annotations.len(),
        unmatched_events: outcome.unmatched_events,
        promoted_silences: outcome.promoted_silences,
        truncated: report.truncated,
        alignment,
    })
}


#[cfg(test)]
mod tests {
    use super::*;
    use bowsync_common::config::SilenceStrategy;
    use bowsync_session_model::event::AnnotationLabel;
    use hound::{SampleFormat, WavSpec, WavWriter};

    #[test]
    fn test_discover_reports_missing_inputs() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(KEYPOINTS_FILE), "").unwrap();
        let missing = UnitInputs::discover(dir.path()).unwrap_err();
        assert_eq!(missing, vec![PITCH_FILE, AUDIO_FILE]);
    }

    #[test]
    fn test_run_unit_writes_all_tables() {
        let dir = tempfile::tempdir().unwrap();
        let unit = dir.path().join("take-01");
        test_support::write_unit(&unit);

        let inputs = UnitInputs::discover(&unit).unwrap();
        assert_eq!(inputs.name, "take-01");
        assert!(inputs.metadata.is_none());

        let summary = run_unit(&inputs, &AppConfig::default()).unwrap();
        assert_eq!(summary.segments, 19);
        assert_eq!(summary.events, 20);
        // The closed end of the last segment still owns frame 319.
        assert_eq!(summary.annotations, 20);
        assert_eq!(summary.promoted_silences, 6);
        assert_eq!(summary.truncated, None);
        assert_eq!(summary.alignment, None);

        let annotations = table::read_annotations(&unit.join(ANNOTATED_FILE)).unwrap();
        assert!(annotations[..6]
            .iter()
            .all(|a| a.annotation == AnnotationLabel::Silence));
        assert_eq!(annotations[6].annotation, AnnotationLabel::Down);
        assert_eq!(annotations[19].annotation, AnnotationLabel::Up);
        assert!(unit.join(DIRECTIONS_FILE).is_file());
        assert!(unit.join(EVENTS_FILE).is_file());
    }

    #[test]
    fn test_metadata_clock_reassigns_frames() {
        let dir = tempfile::tempdir().unwrap();
        test_support::write_unit(dir.path());
        let metadata = dir.path().join(METADATA_FILE);
        std::fs::write(
            &metadata,
            r#"{"StartFrame": 600, "EndFrame": 630, "Duration": 1.0}"#,
        )
        .unwrap();

        let config = SilenceConfig {
            strategy: SilenceStrategy::ConfidenceBased,
            ..Default::default()
        };
        let report =
            classify_events(&dir.path().join(PITCH_FILE), None, Some(&metadata), &config).unwrap();
        assert!((report.events[3].frame - 603.0).abs() < 1e-6);
        assert_eq!(report.silent_events(), 0);
    }

    #[test]
    fn test_empty_audio_rejected_under_confidence_strategy() {
        let dir = tempfile::tempdir().unwrap();
        test_support::write_unit(dir.path());
        let audio = dir.path().join(AUDIO_FILE);
        let spec = WavSpec {
            channels: 1,
            sample_rate: 3000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        WavWriter::create(&audio, spec).unwrap().finalize().unwrap();

        let config = SilenceConfig {
            strategy: SilenceStrategy::ConfidenceBased,
            ..Default::default()
        };
        let err = classify_events(&dir.path().join(PITCH_FILE), Some(&audio), None, &config)
            .unwrap_err();
        assert!(matches!(err, BowsyncError::EmptyInput { .. }));
    }

    #[test]
    fn test_missing_keypoints_is_not_found() {
        let err = extract_directions(Path::new("/nonexistent/keypoints.csv"), &DirectionConfig::default())
            .unwrap_err();
        assert!(matches!(err, BowsyncError::FileNotFound { .. }));
    }
}
