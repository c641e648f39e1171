//! Session metadata used to calibrate the audio-to-frame mapping.

use std::path::Path;

use bowsync_common::clock::FrameClock;
use bowsync_common::error::{BowsyncError, BowsyncResult};
use serde::{Deserialize, Serialize};

/// Video span covered by the audio track (`metadata.json`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionMetadata {
    /// Video frame at audio time zero.
    #[serde(rename = "StartFrame")]
    pub start_frame: f64,

    /// Video frame at the end of the audio.
    #[serde(rename = "EndFrame")]
    pub end_frame: f64,

    /// Audio duration in seconds.
    #[serde(rename = "Duration")]
    pub duration_secs: f64,
}

impl SessionMetadata {
    /// Load metadata from a JSON file.
    pub fn load(path: &Path) -> BowsyncResult<Self> {
        if !path.exists() {
            return Err(BowsyncError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Frame clock anchored on this metadata.
    pub fn clock(&self) -> BowsyncResult<FrameClock> {
        FrameClock::new(self.start_frame, self.end_frame, self.duration_secs)
    }
}
