//! Non-overlapping, binary-searchable set of direction segments.
//!
//! Segments are stored as half-open intervals `[frame_start, frame_end)`;
//! the last segment also owns its `frame_end`. A frame therefore resolves to
//! at most one segment even where neighbours share a boundary.

use bowsync_common::error::{BowsyncError, BowsyncResult};
use bowsync_session_model::direction::DirectionSegment;

/// Ordered, validated partition of a frame range into direction segments.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentPartition {
    segments: Vec<DirectionSegment>,
}

impl SegmentPartition {
    /// Build a partition, rejecting inverted or overlapping segments.
    ///
    /// Gaps between segments are allowed; frames inside a gap match nothing.
    pub fn new(segments: Vec<DirectionSegment>) -> BowsyncResult<Self> {
        if let Some(bad) = segments.iter().find(|s| s.frame_end < s.frame_start) {
            return Err(BowsyncError::malformed(format!(
                "segment ends before it starts: {}..{}",
                bad.frame_start, bad.frame_end
            )));
        }
        if let Some(pair) = segments
            .windows(2)
            .find(|pair| pair[1].frame_start < pair[0].frame_end)
        {
            return Err(BowsyncError::malformed(format!(
                "segments overlap or are out of order: {}..{} then {}..{}",
                pair[0].frame_start, pair[0].frame_end, pair[1].frame_start, pair[1].frame_end
            )));
        }
        Ok(Self { segments })
    }

    /// Index of the segment owning `frame`, if any.
    pub fn locate(&self, frame: f64) -> Option<usize> {
        if !frame.is_finite() {
            return None;
        }
        let after = self
            .segments
            .partition_point(|s| (s.frame_start as f64) <= frame);
        let idx = after.checked_sub(1)?;
        let seg = &self.segments[idx];
        let end = seg.frame_end as f64;
        let is_last = idx + 1 == self.segments.len();
        if frame < end || (is_last && frame <= end) {
            Some(idx)
        } else {
            None
        }
    }

    pub fn segments(&self) -> &[DirectionSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Frame range covered from the first start to the last end.
    pub fn span(&self) -> Option<(i64, i64)> {
        Some((
            self.segments.first()?.frame_start,
            self.segments.last()?.frame_end,
        ))
    }
}
