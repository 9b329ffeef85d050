//! Wavetable generation
//!
//! Tables are sampled from closed-form periodic generators. The generator is
//! parameterized by a reference frequency, so a table of `length` samples may
//! hold part of a cycle, exactly one, or several.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::SynthError;

/// Waveform shapes a table can be generated from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Waveform {
    Sine,
    Triangle,
    Square,
    Sawtooth,
}

impl Waveform {
    /// All waveforms, in key-selection order
    pub const ALL: [Waveform; 4] = [
        Waveform::Sine,
        Waveform::Triangle,
        Waveform::Square,
        Waveform::Sawtooth,
    ];

    /// Upper-case label shown in the HUD
    pub fn display_name(&self) -> &'static str {
        match self {
            Waveform::Sine => "SINE",
            Waveform::Triangle => "TRIANGLE",
            Waveform::Square => "SQUARE",
            Waveform::Sawtooth => "SAWTOOTH",
        }
    }

    /// Evaluate one period of the waveform at `phase` in `[0, 1)`
    fn evaluate(&self, phase: f64) -> f64 {
        match self {
            Waveform::Sine => (2.0 * PI * phase).sin(),
            Waveform::Triangle => ramp(phase, 0.5),
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Sawtooth => ramp(phase, 0.0),
        }
    }

    fn index(&self) -> usize {
        match self {
            Waveform::Sine => 0,
            Waveform::Triangle => 1,
            Waveform::Square => 2,
            Waveform::Sawtooth => 3,
        }
    }
}

impl fmt::Display for Waveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Waveform::Sine => "sine",
            Waveform::Triangle => "triangle",
            Waveform::Square => "square",
            Waveform::Sawtooth => "sawtooth",
        };
        f.write_str(name)
    }
}

impl FromStr for Waveform {
    type Err = SynthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sine" => Ok(Waveform::Sine),
            "triangle" => Ok(Waveform::Triangle),
            "square" => Ok(Waveform::Square),
            "sawtooth" => Ok(Waveform::Sawtooth),
            _ => Err(SynthError::InvalidWaveform(s.to_string())),
        }
    }
}

/// Triangle-family ramp. Rises from -1 to 1 over `[0, width)` and falls back
/// over `[width, 1)`. `width == 0.0` gives a falling sawtooth.
fn ramp(phase: f64, width: f64) -> f64 {
    if phase < width {
        -1.0 + 2.0 * phase / width
    } else {
        1.0 - 2.0 * (phase - width) / (1.0 - width)
    }
}

/// One normalized waveform table, immutable once generated
#[derive(Debug, Clone, PartialEq)]
pub struct Wavetable {
    samples: Vec<f32>,
}

impl Wavetable {
    /// Wrap existing samples, normalizing them to a peak of 1.0
    pub fn from_samples(mut samples: Vec<f32>) -> Result<Self, SynthError> {
        let peak = samples.iter().fold(0.0f32, |peak, s| peak.max(s.abs()));
        if peak <= 0.0 || !peak.is_finite() {
            return Err(SynthError::DegenerateSignal);
        }
        for sample in &mut samples {
            *sample /= peak;
        }
        Ok(Self { samples })
    }

    /// Number of samples in the table
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Tables produced by this module are never empty
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Raw samples
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }
}

/// Generate a normalized table of exactly `length` samples.
///
/// Sample `n` is taken at phase `frac(n * reference_frequency / sample_rate)`.
pub fn generate(
    length: usize,
    waveform: Waveform,
    reference_frequency: f64,
    sample_rate: f64,
) -> Result<Wavetable, SynthError> {
    let usable = |v: f64| v.is_finite() && v > 0.0;
    if length == 0 || !usable(reference_frequency) || !usable(sample_rate) {
        return Err(SynthError::DegenerateSignal);
    }

    let period = sample_rate / reference_frequency;
    let samples = (0..length)
        .map(|n| waveform.evaluate((n as f64 / period).fract()) as f32)
        .collect();

    Wavetable::from_samples(samples)
}

/// One shared table per waveform, built once at startup
#[derive(Debug, Clone)]
pub struct WavetableBank {
    tables: [Arc<Wavetable>; 4],
}

impl WavetableBank {
    /// Generate every waveform with the same length and reference frequency
    pub fn build(
        length: usize,
        reference_frequency: f64,
        sample_rate: f64,
    ) -> Result<Self, SynthError> {
        let table = |w| generate(length, w, reference_frequency, sample_rate).map(Arc::new);
        Ok(Self {
            tables: [
                table(Waveform::Sine)?,
                table(Waveform::Triangle)?,
                table(Waveform::Square)?,
                table(Waveform::Sawtooth)?,
            ],
        })
    }

    /// Shared handle to the table for `waveform`
    pub fn get(&self, waveform: Waveform) -> Arc<Wavetable> {
        Arc::clone(&self.tables[waveform.index()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peak(table: &Wavetable) -> f32 {
        table.samples().iter().fold(0.0f32, |p, s| p.max(s.abs()))
    }

    #[test]
    fn test_tables_have_requested_length_and_unit_peak() {
        for waveform in Waveform::ALL {
            for length in [2, 64, 1000] {
                let table = generate(length, waveform, 440.0, 44100.0).unwrap();
                assert_eq!(table.len(), length, "{waveform} length {length}");
                assert!((peak(&table) - 1.0).abs() < 1e-6, "{waveform} peak");
            }
        }
    }

    #[test]
    fn test_sine_covers_partial_cycle() {
        // 64 samples at 440 Hz / 44.1 kHz is ~0.64 of a period
        let table = generate(64, Waveform::Sine, 440.0, 44100.0).unwrap();
        assert_eq!(table.samples()[0], 0.0);
        let last = table.samples()[63];
        assert!(last < 0.0, "expected second half of the cycle, got {last}");
    }

    #[test]
    fn test_single_cycle_shapes() {
        // reference = sample_rate / 8 gives exactly one cycle in 8 samples
        let square = generate(8, Waveform::Square, 1.0, 8.0).unwrap();
        assert_eq!(square.samples()[0], 1.0);
        assert_eq!(square.samples()[1], 1.0);
        assert_eq!(square.samples()[4], -1.0);

        let triangle = generate(8, Waveform::Triangle, 1.0, 8.0).unwrap();
        assert_eq!(triangle.samples()[0], -1.0);
        assert_eq!(triangle.samples()[2], 0.0);
        assert_eq!(triangle.samples()[4], 1.0);
        assert_eq!(triangle.samples()[6], 0.0);

        let saw = generate(8, Waveform::Sawtooth, 1.0, 8.0).unwrap();
        assert_eq!(saw.samples()[0], 1.0);
        assert_eq!(saw.samples()[4], 0.0);
        assert!(saw.samples().windows(2).all(|w| w[1] < w[0]));
    }

    #[test]
    fn test_multiple_cycles_repeat() {
        let table = generate(32, Waveform::Triangle, 1.0, 8.0).unwrap();
        for n in 0..24 {
            assert_eq!(table.samples()[n], table.samples()[n + 8]);
        }
    }

    #[test]
    fn test_degenerate_signal() {
        // A one-sample sine is just sin(0)
        assert_eq!(
            generate(1, Waveform::Sine, 440.0, 44100.0),
            Err(SynthError::DegenerateSignal)
        );
        assert_eq!(
            generate(0, Waveform::Square, 440.0, 44100.0),
            Err(SynthError::DegenerateSignal)
        );
        assert_eq!(
            generate(64, Waveform::Sine, 0.0, 44100.0),
            Err(SynthError::DegenerateSignal)
        );
        assert_eq!(
            Wavetable::from_samples(vec![0.0; 16]),
            Err(SynthError::DegenerateSignal)
        );
    }

    #[test]
    fn test_generation_is_deterministic() {
        for waveform in Waveform::ALL {
            let a = generate(64, waveform, 440.0, 44100.0).unwrap();
            let b = generate(64, waveform, 440.0, 44100.0).unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_parse_waveform() {
        assert_eq!("sine".parse::<Waveform>(), Ok(Waveform::Sine));
        assert_eq!("Triangle".parse::<Waveform>(), Ok(Waveform::Triangle));
        assert_eq!(" SQUARE ".parse::<Waveform>(), Ok(Waveform::Square));
        assert_eq!("sawtooth".parse::<Waveform>(), Ok(Waveform::Sawtooth));
        assert_eq!(
            "noise".parse::<Waveform>(),
            Err(SynthError::InvalidWaveform("noise".to_string()))
        );
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for waveform in Waveform::ALL {
            assert_eq!(waveform.to_string().parse::<Waveform>(), Ok(waveform));
        }
        assert_eq!(Waveform::Sawtooth.display_name(), "SAWTOOTH");
    }

    #[test]
    fn test_bank_shares_tables() {
        let bank = WavetableBank::build(64, 440.0, 44100.0).unwrap();
        let a = bank.get(Waveform::Square);
        let b = bank.get(Waveform::Square);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.len(), 64);
        assert_ne!(*bank.get(Waveform::Sine), *bank.get(Waveform::Sawtooth));
    }
}
