use std::path::Path;

use bowsync_audio_analysis::{detector_for, load_wav, EventClassifier};
use bowsync_common::config::{SilenceConfig, SilenceStrategy};
use bowsync_session_model::event::NoteEventKind;
use bowsync_session_model::pitch::PitchSample;
use hound::{SampleFormat, WavSpec, WavWriter};

const SAMPLE_RATE: u32 = 3000;

/// `silent_windows` windows of zeros followed by `voiced_windows` windows of
/// a 440 Hz tone, 100 samples per window (30 fps at 3 kHz).
fn write_session_audio(path: &Path, silent_windows: usize, voiced_windows: usize) {
    let spec = WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec).expect("wav should be writable");
    for _ in 0..silent_windows * 100 {
        writer.write_sample(0i16).unwrap();
    }
    for i in 0..voiced_windows * 100 {
        let t = i as f32 / SAMPLE_RATE as f32;
        let s = (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 12000.0;
        writer.write_sample(s as i16).unwrap();
    }
    writer.finalize().unwrap();
}

/// Confident 440 Hz estimates, one per 30 fps frame, offset by 300 frames.
fn confident_samples(n: usize) -> Vec<PitchSample> {
    (0..n)
        .map(|i| PitchSample::new(i as f64 / 30.0, 440.0, 0.9, 300.0 + i as f64))
        .collect()
}

#[test]
fn energy_silence_wins_over_high_confidence() {
    let dir = tempfile::tempdir().unwrap();
    let wav = dir.path().join("audio.wav");
    write_session_audio(&wav, 6, 2);

    let audio = load_wav(&wav).unwrap();
    let config = SilenceConfig::default();
    let detector = detector_for(&config, Some(&audio)).unwrap();
    let report = EventClassifier::new(config).classify(&confident_samples(8), detector.as_ref());

    let kinds: Vec<NoteEventKind> = report.events.iter().map(|e| e.event).collect();
    assert_eq!(
        kinds,
        vec![
            NoteEventKind::Silence,
            NoteEventKind::Silence,
            NoteEventKind::Silence,
            NoteEventKind::Silence,
            NoteEventKind::Silence,
            NoteEventKind::Silence,
            NoteEventKind::Change,
            NoteEventKind::Sustain,
        ]
    );
    assert_eq!(report.events[6].note.as_deref(), Some("A4"));
    assert_eq!(report.truncated, None);
}

#[test]
fn confidence_strategy_sees_no_silence_in_the_same_session() {
    let config = SilenceConfig {
        strategy: SilenceStrategy::ConfidenceBased,
        ..Default::default()
    };
    let detector = detector_for(&config, None).unwrap();
    let report = EventClassifier::new(config).classify(&confident_samples(8), detector.as_ref());
    assert_eq!(report.silent_events(), 0);
}

#[test]
fn longer_audio_is_truncated_to_pitch_length() {
    let dir = tempfile::tempdir().unwrap();
    let wav = dir.path().join("audio.wav");
    write_session_audio(&wav, 6, 4);

    let audio = load_wav(&wav).unwrap();
    let config = SilenceConfig::default();
    let detector = detector_for(&config, Some(&audio)).unwrap();
    let report = EventClassifier::new(config).classify(&confident_samples(8), detector.as_ref());

    assert_eq!(report.events.len(), 8);
    assert_eq!(report.truncated, Some((8, 10)));
}
