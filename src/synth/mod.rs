//! Wavetable synthesis engine
//!
//! Contains table generation, interpolated lookup, the phase-accumulating
//! oscillator and the voice that renders whole note buffers.

mod error;
mod interpolator;
mod oscillator;
mod voice;
mod wavetable;

pub use error::SynthError;
pub use interpolator::{
    CubicInterpolator, InterpolationMode, Interpolator, LinearInterpolator, NearestInterpolator,
};
pub use oscillator::WavetableOscillator;
pub use voice::{
    apply_fade_out, fade_out_gain, FrequencyInput, Voice, DEFAULT_FADE_LENGTH, MAX_DURATION_SECONDS,
};
pub use wavetable::{generate, Waveform, Wavetable, WavetableBank};
