//! WAV file writer for rendered audio
//!
//! Writes 16-bit PCM, duplicating the mono signal into every channel.

use anyhow::{Context, Result};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use super::sample_to_i16;

/// WAV file recorder
pub struct Recorder {
    writer: WavWriter<BufWriter<File>>,
    sample_rate: u32,
    channels: u16,
    frames_written: u64,
}

impl Recorder {
    /// Create a new recorder
    ///
    /// # Arguments
    /// * `path` - Output file path
    /// * `sample_rate` - Sample rate in Hz
    /// * `channels` - Output channels, each receiving the same signal
    pub fn new(path: &Path, sample_rate: u32, channels: u16) -> Result<Self> {
        let spec = WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };

        let writer = WavWriter::create(path, spec)
            .with_context(|| format!("failed to create WAV file: {:?}", path))?;

        Ok(Self {
            writer,
            sample_rate,
            channels,
            frames_written: 0,
        })
    }

    /// Get the number of frames written
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Get the duration recorded in seconds
    pub fn duration_secs(&self) -> f64 {
        self.frames_written as f64 / self.sample_rate as f64
    }

    /// Write one mono sample to every channel
    pub fn write_frame(&mut self, sample: f32) -> Result<()> {
        let value = sample_to_i16(sample);
        for _ in 0..self.channels {
            self.writer
                .write_sample(value)
                .context("failed to write sample")?;
        }
        self.frames_written += 1;
        Ok(())
    }

    /// Write a mono buffer
    pub fn write_buffer(&mut self, buffer: &[f32]) -> Result<()> {
        for &sample in buffer {
            self.write_frame(sample)?;
        }
        Ok(())
    }

    /// Finalize the WAV file
    ///
    /// This must be called to properly close the file and write the header.
    pub fn finalize(self) -> Result<()> {
        self.writer.finalize().context("failed to finalize WAV file")
    }
}
