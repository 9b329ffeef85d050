//! Errors raised by the synthesis core

use thiserror::Error;

/// Precondition violations detected at generation or synthesis time
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SynthError {
    /// The requested waveform name is not one of sine/triangle/square/sawtooth
    #[error("unknown waveform type: {0:?}")]
    InvalidWaveform(String),

    /// Synthesis duration must be positive and finite
    #[error("invalid synthesis duration: {0} s")]
    InvalidDuration(f64),

    /// A generated table has no usable peak amplitude
    #[error("degenerate signal: wavetable has zero peak amplitude")]
    DegenerateSignal,

    /// A per-sample frequency sequence does not cover the output buffer
    #[error("frequency sequence has {actual} samples, expected {expected}")]
    FrequencyLengthMismatch { expected: usize, actual: usize },
}
