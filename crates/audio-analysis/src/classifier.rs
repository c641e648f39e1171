//! Note event classification.
//!
//! Walks pitch samples in order and labels each as `silence`, `change` or
//! `sustain` using an injected [`SilenceDetector`] and the nearest
//! equal-tempered note name.

use bowsync_common::config::SilenceConfig;
use bowsync_session_model::event::{InferredNoteEvent, NoteEventKind};
use bowsync_session_model::pitch::PitchSample;
use serde::Serialize;

use crate::notes::note_name;
use crate::silence::SilenceDetector;

/// Classifier output with diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClassificationReport {
    /// One event per classified sample.
    pub events: Vec<InferredNoteEvent>,
    /// `(samples, flags)` lengths when they disagreed and were truncated.
    pub truncated: Option<(usize, usize)>,
    /// Voiced samples whose frequency lies outside the instrument range.
    pub out_of_range: usize,
}

impl ClassificationReport {
    pub fn silent_events(&self) -> usize {
        self.events.iter().filter(|e| e.event.is_silence()).count()
    }
}

/// The silence/event classifier.
pub struct EventClassifier {
    config: SilenceConfig,
}

impl EventClassifier {
    pub fn new(config: SilenceConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(SilenceConfig::default())
    }

    /// Classify samples against the detector's silence flags.
    ///
    /// Flags align with samples by position; on a length mismatch both are
    /// truncated to the shorter one.
    pub fn classify(
        &self,
        samples: &[PitchSample],
        detector: &dyn SilenceDetector,
    ) -> ClassificationReport {
        let flags = detector.silence_flags(samples);
        let len = samples.len().min(flags.len());
        let truncated = if samples.len() != flags.len() {
            tracing::warn!(
                samples = samples.len(),
                flags = flags.len(),
                kept = len,
                detector = detector.name(),
                "Pitch samples and silence flags differ in length; truncating"
            );
            Some((samples.len(), flags.len()))
        } else {
            None
        };

        let instrument = self.config.instrument;
        let mut previous_note: Option<String> = None;
        let mut out_of_range = 0;
        let mut events = Vec::with_capacity(len);

        for (sample, &silent) in samples.iter().zip(&flags).take(len) {
            if silent {
                events.push(InferredNoteEvent::silence(sample.frame, sample.time));
                continue;
            }

            let in_range = instrument.contains(sample.frequency);
            if !in_range && sample.frequency > 0.0 {
                out_of_range += 1;
            }
            let note = if self.config.restrict_to_range && !in_range {
                None
            } else {
                note_name(sample.frequency)
            };

            let kind = if note != previous_note {
                previous_note = note.clone();
                NoteEventKind::Change
            } else {
                NoteEventKind::Sustain
            };
            events.push(InferredNoteEvent::voiced(sample.frame, sample.time, note, kind));
        }

        let report = ClassificationReport {
            events,
            truncated,
            out_of_range,
        };
        tracing::debug!(
            events = report.events.len(),
            silent = report.silent_events(),
            out_of_range,
            detector = detector.name(),
            "Classified note events"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bowsync_common::config::Instrument;

    /// Detector returning fixed flags.
    struct Fixed(Vec<bool>);

    impl SilenceDetector for Fixed {
        fn silence_flags(&self, _samples: &[PitchSample]) -> Vec<bool> {
            self.0.clone()
        }

        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    fn samples(freqs: &[f64]) -> Vec<PitchSample> {
        freqs
            .iter()
            .enumerate()
            .map(|(i, &f)| PitchSample::new(i as f64 / 30.0, f, 0.9, 300.0 + i as f64))
            .collect()
    }

    fn kinds(report: &ClassificationReport) -> Vec<NoteEventKind> {
        report.events.iter().map(|e| e.event).collect()
    }

    #[test]
    fn test_change_then_sustain() {
        use NoteEventKind::{Change, Silence, Sustain};
        let report = EventClassifier::with_defaults().classify(
            &samples(&[440.0, 441.0, 220.0, 220.0, 220.0]),
            &Fixed(vec![false, false, false, true, false]),
        );
        assert_eq!(kinds(&report), vec![Change, Sustain, Change, Silence, Sustain]);
        assert_eq!(report.events[0].note.as_deref(), Some("A4"));
        assert_eq!(report.events[2].note.as_deref(), Some("A3"));
        assert_eq!(report.events[3].note, None);
        assert_eq!(report.truncated, None);
    }

    #[test]
    fn test_silence_ignores_high_confidence() {
        let report = EventClassifier::with_defaults()
            .classify(&samples(&[440.0; 3]), &Fixed(vec![true; 3]));
        assert_eq!(report.silent_events(), 3);
        assert!(report.events.iter().all(|e| e.note.is_none()));
    }

    #[test]
    fn test_undefined_frequency_takes_part_in_comparison() {
        use NoteEventKind::{Change, Sustain};
        let report = EventClassifier::with_defaults()
            .classify(&samples(&[0.0, -1.0, 440.0, 0.0]), &Fixed(vec![false; 4]));
        // None equals the initial previous note.
        assert_eq!(kinds(&report), vec![Sustain, Sustain, Change, Change]);
        assert_eq!(report.events[3].note, None);
    }

    #[test]
    fn test_length_mismatch_truncates_to_shorter() {
        let report = EventClassifier::with_defaults()
            .classify(&samples(&[440.0; 5]), &Fixed(vec![false; 3]));
        assert_eq!(report.events.len(), 3);
        assert_eq!(report.truncated, Some((5, 3)));

        let report = EventClassifier::with_defaults()
            .classify(&samples(&[440.0; 2]), &Fixed(vec![false; 4]));
        assert_eq!(report.events.len(), 2);
        assert_eq!(report.truncated, Some((2, 4)));
    }

    #[test]
    fn test_instrument_range_restriction() {
        let freqs = [30.0, 440.0, 2000.0];
        let open = EventClassifier::with_defaults().classify(&samples(&freqs), &Fixed(vec![false; 3]));
        assert_eq!(open.out_of_range, 2);
        assert!(open.events.iter().all(|e| e.note.is_some()));

        let restricted = EventClassifier::new(SilenceConfig {
            instrument: Instrument::Cello,
            restrict_to_range: true,
            ..Default::default()
        })
        .classify(&samples(&freqs), &Fixed(vec![false; 3]));
        assert_eq!(restricted.events[0].note, None);
        assert_eq!(restricted.events[1].note.as_deref(), Some("A4"));
        assert_eq!(restricted.events[2].note, None);

        let violin = EventClassifier::new(SilenceConfig {
            instrument: Instrument::Violin,
            restrict_to_range: true,
            ..Default::default()
        })
        .classify(&samples(&freqs), &Fixed(vec![false; 3]));
        assert_eq!(violin.events[2].note.as_deref(), Some("B6"));
    }

    #[test]
    fn test_frames_and_times_are_carried() {
        let report = EventClassifier::with_defaults()
            .classify(&samples(&[440.0, 440.0]), &Fixed(vec![true, false]));
        assert_eq!(report.events[0].frame, 300.0);
        assert_eq!(report.events[1].frame, 301.0);
        assert!((report.events[1].time - 1.0 / 30.0).abs() < 1e-12);
    }
}
