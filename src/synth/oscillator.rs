//! Phase-accumulating wavetable oscillator

use std::sync::Arc;

use super::{Interpolator, LinearInterpolator, Wavetable};

/// Reads a shared wavetable at a settable frequency.
///
/// The oscillator is silent while its frequency is zero or negative and
/// sounding otherwise. Going silent rewinds the phase to the table start.
pub struct WavetableOscillator {
    table: Arc<Wavetable>,
    interpolator: Box<dyn Interpolator>,
    sample_rate: f64,
    index: f64,
    frequency: f64,
    increment: f64,
}

impl WavetableOscillator {
    /// Create a silent oscillator with linear interpolation
    pub fn new(table: Arc<Wavetable>, sample_rate: f64) -> Self {
        Self::with_interpolator(table, sample_rate, Box::new(LinearInterpolator))
    }

    /// Create a silent oscillator using the given lookup strategy
    pub fn with_interpolator(
        table: Arc<Wavetable>,
        sample_rate: f64,
        interpolator: Box<dyn Interpolator>,
    ) -> Self {
        Self {
            table,
            interpolator,
            sample_rate,
            index: 0.0,
            frequency: 0.0,
            increment: 0.0,
        }
    }

    /// Set the frequency and recompute the phase increment
    pub fn set_frequency(&mut self, frequency: f64) {
        self.frequency = frequency;
        self.increment = self.table.len() as f64 * frequency / self.sample_rate;
        if frequency <= 0.0 {
            self.index = 0.0;
        }
    }

    /// Current frequency in Hz
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Table positions advanced per output sample
    pub fn increment(&self) -> f64 {
        self.increment
    }

    /// Current fractional read position, always in `[0, table length)`
    pub fn phase_index(&self) -> f64 {
        self.index
    }

    pub fn table(&self) -> &Arc<Wavetable> {
        &self.table
    }

    /// Read the sample at the current phase, then advance.
    ///
    /// Must be called once per output sample, in order.
    pub fn next_sample(&mut self) -> f32 {
        let sample = self.interpolator.sample(self.table.samples(), self.index);
        let len = self.table.len() as f64;
        self.index = (self.index + self.increment).rem_euclid(len);
        // rem_euclid can round up to `len` for tiny negative inputs
        if self.index >= len {
            self.index = 0.0;
        }
        sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::{generate, NearestInterpolator, Waveform};

    fn ramp_table() -> Arc<Wavetable> {
        Arc::new(Wavetable::from_samples(vec![0.0, 0.25, 0.5, 0.75, 1.0, -1.0, -0.5, -0.25]).unwrap())
    }

    #[test]
    fn test_starts_silent() {
        let osc = WavetableOscillator::new(ramp_table(), 44100.0);
        assert_eq!(osc.frequency(), 0.0);
        assert_eq!(osc.phase_index(), 0.0);
    }

    #[test]
    fn test_increment_formula() {
        let table = Arc::new(generate(64, Waveform::Sine, 440.0, 44100.0).unwrap());
        let mut osc = WavetableOscillator::new(table, 44100.0);
        osc.set_frequency(261.63);
        assert!((osc.increment() - 64.0 * 261.63 / 44100.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_frequency_resets_phase() {
        let mut osc = WavetableOscillator::new(ramp_table(), 8.0);
        osc.set_frequency(3.0);
        for _ in 0..5 {
            osc.next_sample();
        }
        assert!(osc.phase_index() > 0.0);

        osc.set_frequency(0.0);
        assert_eq!(osc.phase_index(), 0.0);
        assert_eq!(osc.increment(), 0.0);

        // Silent oscillator stays parked at the table start
        assert_eq!(osc.next_sample(), 0.0);
        assert_eq!(osc.phase_index(), 0.0);
    }

    #[test]
    fn test_negative_frequency_resets_phase() {
        let mut osc = WavetableOscillator::new(ramp_table(), 8.0);
        osc.set_frequency(1.0);
        osc.next_sample();
        osc.set_frequency(-2.0);
        assert_eq!(osc.phase_index(), 0.0);
        osc.next_sample();
        assert!(osc.phase_index() >= 0.0 && osc.phase_index() < 8.0);
    }

    #[test]
    fn test_phase_after_n_samples() {
        let table = Arc::new(generate(64, Waveform::Sine, 440.0, 44100.0).unwrap());
        let mut osc = WavetableOscillator::new(table, 44100.0);
        osc.set_frequency(440.0);
        let n = 1000;
        for _ in 0..n {
            osc.next_sample();
        }
        let expected = (n as f64 * osc.increment()) % 64.0;
        assert!((osc.phase_index() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_reads_before_advancing() {
        let mut osc = WavetableOscillator::new(ramp_table(), 8.0);
        // One table position per sample
        osc.set_frequency(1.0);
        let samples: Vec<f32> = (0..10).map(|_| osc.next_sample()).collect();
        assert_eq!(&samples[..8], &[0.0, 0.25, 0.5, 0.75, 1.0, -1.0, -0.5, -0.25]);
        assert_eq!(&samples[8..], &[0.0, 0.25]);
    }

    #[test]
    fn test_fractional_increment_interpolates() {
        let mut osc = WavetableOscillator::new(ramp_table(), 16.0);
        osc.set_frequency(1.0); // half a table position per sample
        let samples: Vec<f32> = (0..4).map(|_| osc.next_sample()).collect();
        assert_eq!(samples, vec![0.0, 0.125, 0.25, 0.375]);
    }

    #[test]
    fn test_alternative_interpolator() {
        let mut osc = WavetableOscillator::with_interpolator(
            ramp_table(),
            16.0,
            Box::new(NearestInterpolator),
        );
        osc.set_frequency(1.0);
        osc.next_sample();
        // Index 0.5 rounds away from zero
        assert_eq!(osc.next_sample(), 0.25);
    }

    #[test]
    fn test_phase_stays_in_range() {
        let mut osc = WavetableOscillator::new(ramp_table(), 44100.0);
        for freq in [20.0, 440.0, 15000.0, 44100.0, 100000.0] {
            osc.set_frequency(freq);
            for _ in 0..500 {
                osc.next_sample();
                assert!(osc.phase_index() >= 0.0 && osc.phase_index() < 8.0);
            }
        }
    }
}
