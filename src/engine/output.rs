//! Interface to the audio-output service

/// Identifies one buffer handed to an [`AudioOutput`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundHandle(pub(crate) u64);

/// Plays owned mono buffers and fades them out on request.
///
/// Buffers are f32 in `[-1, 1]` at the output's sample rate. Converting to
/// the device format and channel layout is the implementor's job.
pub trait AudioOutput {
    /// Start playing `buffer`, ramping in over `fade_in_ms`
    fn play(&mut self, buffer: Vec<f32>, fade_in_ms: u32) -> SoundHandle;

    /// Fade the sound to silence over `fade_out_ms` and drop it.
    /// Unknown or finished handles are ignored.
    fn fade_out(&mut self, handle: SoundHandle, fade_out_ms: u32);
}

/// Convert a float sample to 16-bit PCM, clipping out-of-range values
pub fn sample_to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
}
