//! Frequency to note-name conversion (equal temperament, A4 = 440 Hz).

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Nearest MIDI note number, or `None` for non-positive or non-finite input.
pub fn hz_to_midi(hz: f64) -> Option<i32> {
    if !(hz.is_finite() && hz > 0.0) {
        return None;
    }
    Some((12.0 * (hz / 440.0).log2() + 69.0).round() as i32)
}

/// Scientific pitch name such as `A4` or `C#-1`.
pub fn midi_to_note_name(midi: i32) -> String {
    let name = NOTE_NAMES[midi.rem_euclid(12) as usize];
    let octave = midi.div_euclid(12) - 1;
    format!("{name}{octave}")
}

/// Note name of a frequency.
pub fn note_name(hz: f64) -> Option<String> {
    hz_to_midi(hz).map(midi_to_note_name)
}
