//! Buffer synthesis from a bank of unison oscillators

use std::f64::consts::PI;

use super::{SynthError, WavetableOscillator};

/// Samples faded out at the tail of every rendered buffer
pub const DEFAULT_FADE_LENGTH: usize = 1000;

/// Longest buffer a single call may render
pub const MAX_DURATION_SECONDS: f64 = 600.0;

/// Pitch for a synthesis call: held constant or given per output sample
#[derive(Debug, Clone, PartialEq)]
pub enum FrequencyInput {
    Constant(f64),
    PerSample(Vec<f64>),
}

impl FrequencyInput {
    fn at(&self, i: usize) -> f64 {
        match self {
            FrequencyInput::Constant(f) => *f,
            FrequencyInput::PerSample(fs) => fs[i],
        }
    }
}

impl From<f64> for FrequencyInput {
    fn from(frequency: f64) -> Self {
        FrequencyInput::Constant(frequency)
    }
}

impl From<Vec<f64>> for FrequencyInput {
    fn from(frequencies: Vec<f64>) -> Self {
        FrequencyInput::PerSample(frequencies)
    }
}

/// Renders fixed-length note buffers.
///
/// Oscillators are summed in parallel. Their phase carries over between
/// samples of one call and is only reset by replacing the bank.
pub struct Voice {
    oscillators: Vec<WavetableOscillator>,
    sample_rate: f64,
    gain_db: f64,
    fade_length: usize,
}

impl Voice {
    /// Create a voice with no oscillators
    pub fn new(sample_rate: f64, gain_db: f64) -> Self {
        Self {
            oscillators: Vec::new(),
            sample_rate,
            gain_db,
            fade_length: DEFAULT_FADE_LENGTH,
        }
    }

    /// Builder-style fade length
    pub fn with_fade_length(mut self, fade_length: usize) -> Self {
        self.fade_length = fade_length;
        self
    }

    /// Replace the oscillator bank
    pub fn set_oscillators(&mut self, oscillators: Vec<WavetableOscillator>) {
        self.oscillators = oscillators;
    }

    pub fn oscillators(&self) -> &[WavetableOscillator] {
        &self.oscillators
    }

    pub fn set_gain_db(&mut self, gain_db: f64) {
        self.gain_db = gain_db;
    }

    pub fn gain_db(&self) -> f64 {
        self.gain_db
    }

    /// Linear amplitude for the current gain
    pub fn amplitude(&self) -> f64 {
        10f64.powf(self.gain_db / 20.0)
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn fade_length(&self) -> usize {
        self.fade_length
    }

    /// Render `duration_seconds` of audio at the given pitch
    pub fn synthesize(
        &mut self,
        frequency: impl Into<FrequencyInput>,
        duration_seconds: f64,
    ) -> Result<Vec<f32>, SynthError> {
        if !duration_seconds.is_finite()
            || duration_seconds <= 0.0
            || duration_seconds > MAX_DURATION_SECONDS
        {
            return Err(SynthError::InvalidDuration(duration_seconds));
        }

        let len = (duration_seconds * self.sample_rate).round() as usize;
        if len == 0 {
            return Err(SynthError::InvalidDuration(duration_seconds));
        }
        let frequency = frequency.into();
        if let FrequencyInput::PerSample(fs) = &frequency {
            if fs.len() != len {
                return Err(SynthError::FrequencyLengthMismatch {
                    expected: len,
                    actual: fs.len(),
                });
            }
        }

        let mut buffer = vec![0.0f64; len];
        for (i, out) in buffer.iter_mut().enumerate() {
            let f = frequency.at(i);
            for osc in &mut self.oscillators {
                osc.set_frequency(f);
                *out += osc.next_sample() as f64;
            }
        }

        let amplitude = self.amplitude();
        for sample in &mut buffer {
            *sample *= amplitude;
        }
        apply_fade_out(&mut buffer, self.fade_length);

        Ok(buffer.into_iter().map(|s| s as f32).collect())
    }
}

/// Raised-cosine gain for the `i`th of `n` tail samples, from 1.0 down to 0.0
pub fn fade_out_gain(i: usize, n: usize) -> f64 {
    if n <= 1 {
        return 0.0;
    }
    let t = PI * i as f64 / (n - 1) as f64;
    (1.0 + t.cos()) * 0.5
}

/// Fade the last `min(fade_length, len / 2)` samples to zero
pub fn apply_fade_out(signal: &mut [f64], fade_length: usize) {
    let n = fade_length.min(signal.len() / 2);
    let start = signal.len() - n;
    for (i, sample) in signal[start..].iter_mut().enumerate() {
        *sample *= fade_out_gain(i, n);
    }
}
