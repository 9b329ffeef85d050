//! Key events to sounding notes
//!
//! The piano owns the wavetables and the voice. Every note-on renders a
//! complete buffer up front and hands it to the audio output; a key release
//! only asks the output to fade that buffer out.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::PianoConfig;
use crate::keyboard::{
    midi_to_freq, note_number, Key, KeyAction, KeyboardLayout, Octave, PianoKey, LAYOUT,
};
use crate::synth::{
    InterpolationMode, SynthError, Voice, Waveform, Wavetable, WavetableBank, WavetableOscillator,
};

use super::{AudioOutput, SoundHandle};

/// Events delivered by the input service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    Quit,
}

/// Whether the loop should keep running after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// A note whose key is still held down
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeldNote {
    pub handle: SoundHandle,
    pub note: i32,
    pub frequency: f64,
}

/// Interactive piano state
pub struct Piano {
    layout: &'static KeyboardLayout,
    bank: WavetableBank,
    voice: Voice,
    waveform: Waveform,
    octave: Octave,
    interpolation: InterpolationMode,
    unison: usize,
    sample_rate: f64,
    note_duration: f64,
    fade_in_ms: u32,
    fade_out_ms: u32,
    held: HashMap<char, HeldNote>,
}

impl Piano {
    /// Build the wavetables and the initial voice from configuration
    pub fn new(config: &PianoConfig) -> Result<Self, SynthError> {
        let sample_rate = config.audio.sample_rate as f64;
        let synth = &config.synth;
        let bank = WavetableBank::build(synth.wavetable_size, synth.reference_frequency, sample_rate)?;
        let voice = Voice::new(sample_rate, synth.gain_db).with_fade_length(synth.fade_length);

        let mut piano = Self {
            layout: &LAYOUT,
            bank,
            voice,
            waveform: synth.waveform,
            octave: Octave::new(config.keyboard.base_octave),
            interpolation: synth.interpolation,
            unison: synth.unison.max(1),
            sample_rate,
            note_duration: synth.note_duration,
            fade_in_ms: config.keyboard.fade_in_ms,
            fade_out_ms: config.keyboard.fade_out_ms,
            held: HashMap::new(),
        };
        piano.set_waveform(synth.waveform);
        Ok(piano)
    }

    pub fn octave(&self) -> Octave {
        self.octave
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Table the current oscillator bank reads from
    pub fn wavetable(&self) -> Arc<Wavetable> {
        self.bank.get(self.waveform)
    }

    /// Override the length of rendered notes
    pub fn set_note_duration(&mut self, seconds: f64) {
        self.note_duration = seconds;
    }

    /// Currently held notes keyed by computer key
    pub fn held_notes(&self) -> &HashMap<char, HeldNote> {
        &self.held
    }

    pub fn is_held(&self, key: char) -> bool {
        self.held.contains_key(&key)
    }

    /// Replace the oscillator bank with fresh oscillators on `waveform`.
    ///
    /// Buffers already handed to the output keep playing unchanged.
    pub fn set_waveform(&mut self, waveform: Waveform) {
        let table = self.bank.get(waveform);
        let oscillators = (0..self.unison)
            .map(|_| {
                WavetableOscillator::with_interpolator(
                    Arc::clone(&table),
                    self.sample_rate,
                    self.interpolation.build(),
                )
            })
            .collect();
        self.voice.set_oscillators(oscillators);
        self.waveform = waveform;
        tracing::debug!(waveform = %waveform, "waveform selected");
    }

    pub fn shift_octave(&mut self, delta: i8) {
        self.octave = self.octave.shift(delta);
        tracing::debug!(octave = self.octave.value(), "octave changed");
    }

    /// Render one note buffer at `frequency`
    pub fn render(&mut self, frequency: f64) -> Result<Vec<f32>, SynthError> {
        self.voice.synthesize(frequency, self.note_duration)
    }

    /// Dispatch an input event
    pub fn handle_event<O: AudioOutput>(
        &mut self,
        event: InputEvent,
        output: &mut O,
    ) -> Result<Control, SynthError> {
        match event {
            InputEvent::KeyDown(key) => self.key_down(key, output),
            InputEvent::KeyUp(key) => {
                self.key_up(key, output);
                Ok(Control::Continue)
            }
            InputEvent::Quit => Ok(Control::Quit),
        }
    }

    /// Handle a key press
    pub fn key_down<O: AudioOutput>(
        &mut self,
        key: Key,
        output: &mut O,
    ) -> Result<Control, SynthError> {
        match self.layout.action(key) {
            Some(KeyAction::Quit) => return Ok(Control::Quit),
            Some(KeyAction::ShiftOctave(delta)) => self.shift_octave(delta),
            Some(KeyAction::SelectWaveform(waveform)) => self.set_waveform(waveform),
            Some(KeyAction::Note(piano_key)) => self.note_on(piano_key, output)?,
            None => {}
        }
        Ok(Control::Continue)
    }

    /// Start `key` unless it is already sounding
    pub fn note_on<O: AudioOutput>(
        &mut self,
        key: PianoKey,
        output: &mut O,
    ) -> Result<(), SynthError> {
        if self.held.contains_key(&key.key) {
            return Ok(());
        }

        let note = note_number(self.octave, key.offset);
        let frequency = midi_to_freq(note);
        let buffer = self.render(frequency)?;
        let handle = output.play(buffer, self.fade_in_ms);

        tracing::debug!(key = %key.key, note, frequency, "note on");
        self.held.insert(key.key, HeldNote { handle, note, frequency });
        Ok(())
    }

    /// Handle a key release: fade out the note it started, if any
    pub fn key_up<O: AudioOutput>(&mut self, key: Key, output: &mut O) {
        if let Key::Char(c) = key.normalized() {
            if let Some(held) = self.held.remove(&c) {
                output.fade_out(held.handle, self.fade_out_ms);
                tracing::debug!(key = %c, note = held.note, "note off");
            }
        }
    }

    /// Fade out every held note
    pub fn release_all<O: AudioOutput>(&mut self, output: &mut O) {
        for (_, held) in self.held.drain() {
            output.fade_out(held.handle, self.fade_out_ms);
        }
    }
}
