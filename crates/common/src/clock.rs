//! Frame/time mapping utilities for stream synchronization.
//!
//! The video and audio streams are numbered independently. This module
//! provides:
//! - A linear frame clock anchored on two `(frame, time)` points
//! - A fixed frame offset reconciling two frame numberings

use serde::{Deserialize, Serialize};

use crate::error::{BowsyncError, BowsyncResult};

/// Linear mapping between seconds and (fractional) frame numbers.
///
/// Anchored at `start_frame` for `t = 0` and `end_frame` for
/// `t = duration_secs`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameClock {
    start_frame: f64,
    end_frame: f64,
    duration_secs: f64,
}

impl FrameClock {
    /// Create a clock from its two anchors.
    pub fn new(start_frame: f64, end_frame: f64, duration_secs: f64) -> BowsyncResult<Self> {
        if !(start_frame.is_finite() && end_frame.is_finite()) {
            return Err(BowsyncError::malformed(format!(
                "frame anchors must be finite, got {start_frame}..{end_frame}"
            )));
        }
        if !(duration_secs.is_finite() && duration_secs > 0.0) {
            return Err(BowsyncError::malformed(format!(
                "clock duration must be positive, got {duration_secs}"
            )));
        }
        Ok(Self {
            start_frame,
            end_frame,
            duration_secs,
        })
    }

    /// Continuous frame estimate for a time in seconds.
    pub fn frame_at(&self, time_secs: f64) -> f64 {
        self.start_frame + (time_secs / self.duration_secs) * (self.end_frame - self.start_frame)
    }

    /// Frames per second implied by the anchors.
    pub fn fps(&self) -> f64 {
        (self.end_frame - self.start_frame) / self.duration_secs
    }
}

/// A fixed additive shift between two frame numberings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FrameOffset(pub i64);

impl FrameOffset {
    /// Shift a native frame into the offset numbering.
    ///
    /// Frame numbers come from input tables, so overflow is malformed input.
    pub fn apply(self, frame: i64) -> BowsyncResult<i64> {
        frame.checked_add(self.0).ok_or_else(|| {
            BowsyncError::malformed(format!(
                "frame {frame} cannot be shifted by {} without overflow",
                self.0
            ))
        })
    }

    /// Shift a (fractional) offset frame back into the native numbering.
    pub fn remove_f64(self, frame: f64) -> f64 {
        frame - self.0 as f64
    }
}
