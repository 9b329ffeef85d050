//! Static computer-keyboard layout
//!
//! The home row plays white keys, the row above plays black keys, `z`/`x`
//! shift the octave and `1`-`4` pick the waveform.

use crate::synth::Waveform;

/// A key as reported by the input service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Escape,
}

impl Key {
    /// Letters are matched without regard to case
    pub fn normalized(self) -> Self {
        match self {
            Key::Char(c) => Key::Char(c.to_ascii_lowercase()),
            Key::Escape => Key::Escape,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyColor {
    White,
    Black,
}

/// One playable key of the piano
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PianoKey {
    /// Computer key that plays it
    pub key: char,
    /// Semitones above the octave's C
    pub offset: u8,
    pub color: KeyColor,
    /// Note name shown on the keyboard widget
    pub label: &'static str,
}

const fn white(key: char, offset: u8, label: &'static str) -> PianoKey {
    PianoKey { key, offset, color: KeyColor::White, label }
}

const fn black(key: char, offset: u8, label: &'static str) -> PianoKey {
    PianoKey { key, offset, color: KeyColor::Black, label }
}

/// What pressing a key does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Note(PianoKey),
    ShiftOctave(i8),
    SelectWaveform(Waveform),
    Quit,
}

/// Key-to-action tables
#[derive(Debug)]
pub struct KeyboardLayout {
    pub white_keys: [PianoKey; 8],
    pub black_keys: [PianoKey; 5],
    pub octave_keys: [(char, i8); 2],
    pub waveform_keys: [(char, Waveform); 4],
}

/// The layout used by the piano
pub static LAYOUT: KeyboardLayout = KeyboardLayout {
    white_keys: [
        white('a', 0, "C"),
        white('s', 2, "D"),
        white('d', 4, "E"),
        white('f', 5, "F"),
        white('g', 7, "G"),
        white('h', 9, "A"),
        white('j', 11, "B"),
        white('k', 12, "C"),
    ],
    // No black key between E-F or B-C
    black_keys: [
        black('w', 1, "C#"),
        black('e', 3, "D#"),
        black('t', 6, "F#"),
        black('y', 8, "G#"),
        black('u', 10, "A#"),
    ],
    octave_keys: [('z', -1), ('x', 1)],
    waveform_keys: [
        ('1', Waveform::Sine),
        ('2', Waveform::Triangle),
        ('3', Waveform::Square),
        ('4', Waveform::Sawtooth),
    ],
};

impl KeyboardLayout {
    /// Action bound to `key`, if any
    pub fn action(&self, key: Key) -> Option<KeyAction> {
        let c = match key.normalized() {
            Key::Escape => return Some(KeyAction::Quit),
            Key::Char(c) => c,
        };

        if let Some(&(_, delta)) = self.octave_keys.iter().find(|(k, _)| *k == c) {
            return Some(KeyAction::ShiftOctave(delta));
        }
        if let Some(&(_, waveform)) = self.waveform_keys.iter().find(|(k, _)| *k == c) {
            return Some(KeyAction::SelectWaveform(waveform));
        }
        self.piano_key(c).map(KeyAction::Note)
    }

    /// Playable key bound to `c`
    pub fn piano_key(&self, c: char) -> Option<PianoKey> {
        let c = c.to_ascii_lowercase();
        self.white_keys
            .iter()
            .chain(self.black_keys.iter())
            .find(|k| k.key == c)
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_white_key_offsets() {
        let offsets: Vec<u8> = LAYOUT.white_keys.iter().map(|k| k.offset).collect();
        assert_eq!(offsets, vec![0, 2, 4, 5, 7, 9, 11, 12]);
    }

    #[test]
    fn test_black_key_offsets() {
        let offsets: Vec<u8> = LAYOUT.black_keys.iter().map(|k| k.offset).collect();
        assert_eq!(offsets, vec![1, 3, 6, 8, 10]);
        assert!(LAYOUT.black_keys.iter().all(|k| k.color == KeyColor::Black));
    }

    #[test]
    fn test_note_actions() {
        match LAYOUT.action(Key::Char('a')) {
            Some(KeyAction::Note(key)) => {
                assert_eq!(key.offset, 0);
                assert_eq!(key.color, KeyColor::White);
            }
            other => panic!("unexpected action {:?}", other),
        }
        match LAYOUT.action(Key::Char('W')) {
            Some(KeyAction::Note(key)) => assert_eq!(key.offset, 1),
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_control_actions() {
        assert_eq!(LAYOUT.action(Key::Char('z')), Some(KeyAction::ShiftOctave(-1)));
        assert_eq!(LAYOUT.action(Key::Char('x')), Some(KeyAction::ShiftOctave(1)));
        assert_eq!(
            LAYOUT.action(Key::Char('3')),
            Some(KeyAction::SelectWaveform(Waveform::Square))
        );
        assert_eq!(LAYOUT.action(Key::Escape), Some(KeyAction::Quit));
    }

    #[test]
    fn test_unmapped_keys() {
        assert_eq!(LAYOUT.action(Key::Char('r')), None);
        assert_eq!(LAYOUT.action(Key::Char('5')), None);
        assert_eq!(LAYOUT.piano_key('q'), None);
    }
}
