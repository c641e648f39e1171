//! Pitch samples produced by the external pitch estimator.

use bowsync_common::clock::FrameClock;
use bowsync_common::error::{BowsyncError, BowsyncResult};
use serde::{Deserialize, Serialize};

/// One row of the pitch estimator's output table.
///
/// `Frame` may be missing when the estimator was run without frame
/// calibration; a [`FrameClock`] then supplies it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PitchRow {
    #[serde(rename = "Time (s)")]
    pub time: f64,

    #[serde(rename = "Frequency (Hz)")]
    pub frequency: f64,

    #[serde(rename = "Confidence")]
    pub confidence: f64,

    #[serde(rename = "Frame", default)]
    pub frame: Option<f64>,
}

/// A pitch estimate at one time step, mapped onto the video frame axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PitchSample {
    /// Seconds from the start of the audio.
    pub time: f64,
    /// Estimated fundamental frequency in Hz.
    pub frequency: f64,
    /// Voicing confidence in `[0, 1]`.
    pub confidence: f64,
    /// Continuous frame estimate.
    pub frame: f64,
}

impl PitchSample {
    pub fn new(time: f64, frequency: f64, confidence: f64, frame: f64) -> Self {
        Self {
            time,
            frequency,
            confidence,
            frame,
        }
    }
}

impl From<PitchSample> for PitchRow {
    fn from(sample: PitchSample) -> Self {
        Self {
            time: sample.time,
            frequency: sample.frequency,
            confidence: sample.confidence,
            frame: Some(sample.frame),
        }
    }
}

/// Convert table rows into samples.
///
/// With a clock, every frame is recomputed from the row's time. Without
/// one, each row must carry its own frame.
pub fn samples_from_rows(
    rows: &[PitchRow],
    clock: Option<&FrameClock>,
) -> BowsyncResult<Vec<PitchSample>> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let frame = match (clock, row.frame) {
                (Some(clock), _) => clock.frame_at(row.time),
                (None, Some(frame)) => frame,
                (None, None) => {
                    return Err(BowsyncError::malformed(format!(
                        "pitch row {i} has no frame and no frame clock was supplied"
                    )))
                }
            };
            if !(row.time.is_finite() && frame.is_finite()) {
                return Err(BowsyncError::malformed(format!(
                    "pitch row {i} has a non-finite time or frame"
                )));
            }
            Ok(PitchSample::new(row.time, row.frequency, row.confidence, frame))
        })
        .collect()
}
