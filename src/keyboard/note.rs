//! Note numbers and equal-temperament frequencies

/// Lowest selectable octave
pub const MIN_OCTAVE: u8 = 1;
/// Highest selectable octave
pub const MAX_OCTAVE: u8 = 7;

/// MIDI note of the tuning reference
pub const A4_NOTE: i32 = 69;
/// Tuning reference in Hz
pub const A4_FREQUENCY: f64 = 440.0;

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Keyboard octave, always within `[MIN_OCTAVE, MAX_OCTAVE]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Octave(u8);

impl Octave {
    /// Clamp `value` into the playable range
    pub fn new(value: u8) -> Self {
        Self(value.clamp(MIN_OCTAVE, MAX_OCTAVE))
    }

    /// Move by `delta` octaves, saturating at the range ends
    pub fn shift(self, delta: i8) -> Self {
        let shifted = (self.0 as i16 + delta as i16).clamp(MIN_OCTAVE as i16, MAX_OCTAVE as i16);
        Self(shifted as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

/// MIDI note for a semitone offset within the given octave
pub fn note_number(octave: Octave, offset: u8) -> i32 {
    12 * octave.value() as i32 + offset as i32
}

/// Equal-temperament frequency with A4 (note 69) at 440 Hz
pub fn midi_to_freq(note: i32) -> f64 {
    A4_FREQUENCY * 2f64.powf((note - A4_NOTE) as f64 / 12.0)
}

/// Nearest MIDI note for a frequency
pub fn freq_to_midi(frequency: f64) -> i32 {
    (A4_NOTE as f64 + 12.0 * (frequency / A4_FREQUENCY).log2()).round() as i32
}

/// Pitch-class name with the keyboard octave, e.g. note 48 is `C4`
pub fn note_name(note: i32) -> String {
    let pitch = note.rem_euclid(12) as usize;
    format!("{}{}", NOTE_NAMES[pitch], note.div_euclid(12))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_pitch() {
        assert_eq!(midi_to_freq(69), 440.0);
        assert_eq!(midi_to_freq(81), 880.0);
        assert_eq!(midi_to_freq(57), 220.0);
    }

    #[test]
    fn test_semitone_ratio() {
        let ratio = midi_to_freq(61) / midi_to_freq(60);
        assert!((ratio - 2f64.powf(1.0 / 12.0)).abs() < 1e-12);
        assert!((midi_to_freq(60) - 261.6256).abs() < 1e-3);
    }

    #[test]
    fn test_freq_to_midi() {
        assert_eq!(freq_to_midi(440.0), 69);
        assert_eq!(freq_to_midi(261.63), 60);
        assert_eq!(freq_to_midi(450.0), 69);
        for note in 12..108 {
            assert_eq!(freq_to_midi(midi_to_freq(note)), note);
        }
    }

    #[test]
    fn test_note_number() {
        assert_eq!(note_number(Octave::new(4), 0), 48);
        assert_eq!(note_number(Octave::new(4), 1), 49);
        assert_eq!(note_number(Octave::new(3), 12), 48);
        assert_eq!(note_number(Octave::new(7), 11), 95);
    }

    #[test]
    fn test_octave_clamps() {
        assert_eq!(Octave::new(0).value(), 1);
        assert_eq!(Octave::new(9).value(), 7);
        assert_eq!(Octave::new(1).shift(-1).value(), 1);
        assert_eq!(Octave::new(7).shift(1).value(), 7);
        assert_eq!(Octave::new(3).shift(1).value(), 4);
        assert_eq!(Octave::new(3).shift(-1).value(), 2);
    }

    #[test]
    fn test_note_name() {
        assert_eq!(note_name(48), "C4");
        assert_eq!(note_name(49), "C#4");
        assert_eq!(note_name(69), "A5");
        assert_eq!(note_name(95), "B7");
    }
}
