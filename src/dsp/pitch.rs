//! Note-name parsing for pattern tables.

/// Parse a note name (e.g. "A2", "C#3", "Bb4") into a MIDI note number.
pub fn note_to_midi(note: &str) -> Option<i32> {
    let mut chars = note.chars();
    let base_semitone = match chars.next()? {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return None,
    };

    let rest = chars.as_str();
    let (semitone, octave_str) = if let Some(r) = rest.strip_prefix('#') {
        (base_semitone + 1, r)
    } else if let Some(r) = rest.strip_prefix('b') {
        (base_semitone - 1, r)
    } else {
        (base_semitone, rest)
    };

    let octave: i32 = octave_str.parse().ok()?;

    // C4 = 60
    Some((octave + 1) * 12 + semitone)
}

/// Equal-tempered frequency of a MIDI note, with A4 (MIDI 69) at `tuning_pitch`.
pub fn midi_to_frequency(midi: i32, tuning_pitch: f64) -> f64 {
    tuning_pitch * 2.0_f64.powf((midi as f64 - 69.0) / 12.0)
}

/// Note name to frequency at A4 = 440 Hz.
pub fn note_to_frequency(note: &str) -> Option<f64> {
    note_to_midi(note).map(|midi| midi_to_frequency(midi, 440.0))
}
