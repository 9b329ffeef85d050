//! Software mixer backing the audio output
//!
//! The Mixer is what the piano plays into. It:
//! - Holds every rendered note buffer that is still sounding
//! - Applies the fade-in requested at play time
//! - Applies fade-outs requested on key release
//! - Sums the sounding buffers into the output stream

use std::sync::{Arc, Mutex, PoisonError};

use super::{AudioOutput, SoundHandle};

/// A buffer being played back
struct Sound {
    id: u64,
    samples: Vec<f32>,
    position: usize,
    fade_in: usize,
    /// (samples left, total) once a fade-out was requested
    fade_out: Option<(usize, usize)>,
}

impl Sound {
    fn is_finished(&self) -> bool {
        self.position >= self.samples.len() || matches!(self.fade_out, Some((0, _)))
    }

    fn next(&mut self) -> f32 {
        let mut gain = 1.0;
        if self.position < self.fade_in {
            gain *= self.position as f32 / self.fade_in as f32;
        }
        if let Some((left, total)) = self.fade_out.as_mut() {
            gain *= *left as f32 / *total as f32;
            *left -= 1;
        }
        let sample = self.samples[self.position] * gain;
        self.position += 1;
        sample
    }
}

/// Mixes independently owned note buffers
pub struct Mixer {
    sounds: Vec<Sound>,
    sample_rate: u32,
    next_id: u64,
}

impl Mixer {
    /// Create an empty mixer
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sounds: Vec::new(),
            sample_rate,
            next_id: 0,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of sounds still playing
    pub fn active_count(&self) -> usize {
        self.sounds.len()
    }

    /// Whether nothing is playing
    pub fn is_idle(&self) -> bool {
        self.sounds.is_empty()
    }

    /// Whether `handle` is still playing
    pub fn is_playing(&self, handle: SoundHandle) -> bool {
        self.sounds.iter().any(|s| s.id == handle.0)
    }

    fn ms_to_samples(&self, ms: u32) -> usize {
        (ms as u64 * self.sample_rate as u64 / 1000) as usize
    }

    /// Generate the next output sample (sum of all sounds)
    pub fn process(&mut self) -> f32 {
        let mut output = 0.0;
        for sound in &mut self.sounds {
            if !sound.is_finished() {
                output += sound.next();
            }
        }
        self.sounds.retain(|s| !s.is_finished());
        output.clamp(-1.0, 1.0)
    }

    /// Fill a buffer with samples
    pub fn fill_buffer(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process();
        }
    }
}

impl AudioOutput for Mixer {
    fn play(&mut self, buffer: Vec<f32>, fade_in_ms: u32) -> SoundHandle {
        let id = self.next_id;
        self.next_id += 1;
        let fade_in = self.ms_to_samples(fade_in_ms);
        self.sounds.push(Sound {
            id,
            samples: buffer,
            position: 0,
            fade_in,
            fade_out: None,
        });
        SoundHandle(id)
    }

    fn fade_out(&mut self, handle: SoundHandle, fade_out_ms: u32) {
        let total = self.ms_to_samples(fade_out_ms);
        if let Some(sound) = self.sounds.iter_mut().find(|s| s.id == handle.0) {
            // A running fade is kept
            if sound.fade_out.is_none() {
                sound.fade_out = Some((total, total.max(1)));
            }
        }
        self.sounds.retain(|s| !s.is_finished());
    }
}

/// The mixer as shared with the audio callback thread
impl AudioOutput for Arc<Mutex<Mixer>> {
    fn play(&mut self, buffer: Vec<f32>, fade_in_ms: u32) -> SoundHandle {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .play(buffer, fade_in_ms)
    }

    fn fade_out(&mut self, handle: SoundHandle, fade_out_ms: u32) {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .fade_out(handle, fade_out_ms)
    }
}
