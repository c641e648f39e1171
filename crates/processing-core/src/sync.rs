//! Dual-stream synchronization of bow directions and note events.
//!
//! # Algorithm
//!
//! 1. **Shift** direction segments by the configured frame offset so both
//!    streams share one frame numbering.
//! 2. **Group** consecutive silence events; runs of at least
//!    `min_silence_run` events are true silences.
//! 3. **Match** each event to the segment owning its frame.
//! 4. **Annotate** matched events with `silence` or the segment direction,
//!    shifting frames back into the direction stream's numbering.

use bowsync_common::clock::FrameOffset;
use bowsync_common::config::SyncConfig;
use bowsync_common::error::{BowsyncError, BowsyncResult};
use bowsync_session_model::direction::DirectionSegment;
use bowsync_session_model::event::{Annotation, AnnotationLabel, InferredNoteEvent};

use crate::partition::SegmentPartition;

/// A maximal run of consecutive silence events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SilenceRun {
    /// Index of the first event in the run.
    pub start: usize,
    /// Number of events in the run.
    pub len: usize,
}

impl SilenceRun {
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// Result of one synchronization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncOutcome {
    /// Fused annotations in segment order, then event order.
    pub annotations: Vec<Annotation>,
    /// Events that fell outside every segment.
    pub unmatched_events: usize,
    /// Events promoted to a `silence` annotation.
    pub promoted_silences: usize,
}

impl SyncOutcome {
    /// An alignment error when no event matched any segment.
    pub fn alignment_error(&self) -> Option<BowsyncError> {
        if self.annotations.is_empty() {
            Some(BowsyncError::alignment(format!(
                "no event frame falls inside any direction segment ({} events unmatched)",
                self.unmatched_events
            )))
        } else {
            None
        }
    }
}

/// The stream synchronizer.
pub struct StreamSynchronizer {
    config: SyncConfig,
}

impl StreamSynchronizer {
    /// Create a new synchronizer with the given configuration.
    pub fn new(config: SyncConfig) -> Self {
        Self { config }
    }

    /// Create a synchronizer with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(SyncConfig::default())
    }

    fn offset(&self) -> FrameOffset {
        FrameOffset(self.config.frame_offset)
    }

    /// Fuse direction segments (native numbering) with note events
    /// (offset numbering) into annotations.
    pub fn synchronize(
        &self,
        segments: &[DirectionSegment],
        events: &[InferredNoteEvent],
    ) -> BowsyncResult<SyncOutcome> {
        let offset = self.offset();
        let shifted = segments
            .iter()
            .map(|s| s.shifted(offset))
            .collect::<BowsyncResult<Vec<_>>>()?;
        let partition = SegmentPartition::new(shifted)?;
        let true_silence = self.true_silence_mask(events);

        let mut buckets: Vec<Vec<usize>> = vec![Vec::new(); partition.len()];
        let mut unmatched_events = 0;
        for (i, event) in events.iter().enumerate() {
            match partition.locate(event.frame) {
                Some(seg) => buckets[seg].push(i),
                None => unmatched_events += 1,
            }
        }

        let mut annotations = Vec::with_capacity(events.len() - unmatched_events);
        let mut promoted_silences = 0;
        for (segment, bucket) in partition.segments().iter().zip(&buckets) {
            for &i in bucket {
                let event = &events[i];
                let annotation = if true_silence[i] {
                    promoted_silences += 1;
                    AnnotationLabel::Silence
                } else {
                    AnnotationLabel::from(segment.direction)
                };
                annotations.push(Annotation {
                    frame: offset.remove_f64(event.frame).trunc() as i64,
                    time: event.time,
                    note: event.note.clone(),
                    event: event.event,
                    annotation,
                });
            }
        }

        let outcome = SyncOutcome {
            annotations,
            unmatched_events,
            promoted_silences,
        };

        if outcome.annotations.is_empty() && !events.is_empty() {
            tracing::warn!(
                segments = partition.len(),
                events = events.len(),
                offset = self.config.frame_offset,
                span = ?partition.span(),
                "No overlapping frame range between direction and event streams"
            );
        } else {
            tracing::debug!(
                annotations = outcome.annotations.len(),
                unmatched = unmatched_events,
                promoted = promoted_silences,
                "Synchronized streams"
            );
        }

        Ok(outcome)
    }

    /// Maximal runs of consecutive silence events.
    pub fn silence_runs(events: &[InferredNoteEvent]) -> Vec<SilenceRun> {
        let mut runs = Vec::new();
        let mut current: Option<SilenceRun> = None;

        for (i, event) in events.iter().enumerate() {
            if event.event.is_silence() {
                match current.as_mut() {
                    Some(run) => run.len += 1,
                    None => current = Some(SilenceRun { start: i, len: 1 }),
                }
            } else if let Some(run) = current.take() {
                runs.push(run);
            }
        }
        runs.extend(current);
        runs
    }

    /// Per-event flag: belongs to a run of at least `min_silence_run` silences.
    pub fn true_silence_mask(&self, events: &[InferredNoteEvent]) -> Vec<bool> {
        let mut mask = vec![false; events.len()];
        for run in Self::silence_runs(events) {
            if run.len >= self.config.min_silence_run {
                mask[run.start..run.end()].fill(true);
            }
        }
        mask
    }
}
