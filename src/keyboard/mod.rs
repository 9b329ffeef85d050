//! Keyboard-to-note mapping
//!
//! Maps computer keys to semitone offsets and notes to frequencies.

mod layout;
mod note;

pub use layout::{Key, KeyAction, KeyColor, KeyboardLayout, PianoKey, LAYOUT};
pub use note::{
    freq_to_midi, midi_to_freq, note_name, note_number, Octave, A4_FREQUENCY, A4_NOTE, MAX_OCTAVE,
    MIN_OCTAVE,
};
