//! Real-time audio playback using cpal

use anyhow::{anyhow, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{
    BufferSize, Device, SampleFormat, SampleRate, Stream, StreamConfig, SupportedBufferSize,
};
use std::sync::{Arc, Mutex};

use super::Mixer;
use crate::config::AudioConfig;

/// Real-time audio player
pub struct Player {
    device: Device,
    config: StreamConfig,
    sample_format: SampleFormat,
    stream: Option<Stream>,
}

impl Player {
    /// Open an output device without starting playback.
    ///
    /// Uses the configured sample rate when the device supports it and the
    /// device default otherwise; check [`Player::sample_rate`] before
    /// rendering audio for it.
    pub fn open(audio: &AudioConfig) -> Result<Self> {
        let host = cpal::default_host();
        let device = match &audio.device {
            Some(name) => host
                .output_devices()?
                .find(|d| d.name().map(|n| n == *name).unwrap_or(false))
                .ok_or_else(|| anyhow!("Output device not found: {}", name))?,
            None => host
                .default_output_device()
                .ok_or_else(|| anyhow!("No output device available"))?,
        };

        let wanted = SampleRate(audio.sample_rate);
        let supported = device
            .supported_output_configs()
            .context("failed to query output configs")?
            .find(|range| range.min_sample_rate() <= wanted && wanted <= range.max_sample_rate())
            .map(|range| range.with_sample_rate(wanted));

        let supported = match supported {
            Some(config) => config,
            None => {
                let fallback = device.default_output_config()?;
                tracing::warn!(
                    requested = audio.sample_rate,
                    using = fallback.sample_rate().0,
                    "sample rate not supported by device"
                );
                fallback
            }
        };

        let sample_format = supported.sample_format();
        let buffer_size = buffer_size_for(supported.buffer_size(), audio.buffer_size as u32);
        let mut config: StreamConfig = supported.into();
        config.buffer_size = buffer_size;

        tracing::info!(
            device = %device.name().unwrap_or_default(),
            sample_rate = config.sample_rate.0,
            channels = config.channels,
            buffer_size = ?config.buffer_size,
            "output device opened"
        );

        Ok(Self {
            device,
            config,
            sample_format,
            stream: None,
        })
    }

    /// Sample rate the stream runs at
    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    /// Start pulling audio from the mixer
    pub fn start(&mut self, mixer: Arc<Mutex<Mixer>>) -> Result<()> {
        let stream = match self.sample_format {
            SampleFormat::F32 => self.build_stream::<f32>(mixer)?,
            SampleFormat::I16 => self.build_stream::<i16>(mixer)?,
            SampleFormat::U16 => self.build_stream::<u16>(mixer)?,
            format => return Err(anyhow!("Unsupported sample format: {:?}", format)),
        };

        stream.play()?;
        self.stream = Some(stream);

        Ok(())
    }

    /// Stop playback
    pub fn stop(&mut self) {
        self.stream = None;
    }

    fn build_stream<T: cpal::Sample + cpal::SizedSample + cpal::FromSample<f32>>(
        &self,
        mixer: Arc<Mutex<Mixer>>,
    ) -> Result<Stream> {
        let channels = self.config.channels as usize;

        let stream = self.device.build_output_stream(
            &self.config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                if let Ok(mut mixer) = mixer.try_lock() {
                    for frame in data.chunks_mut(channels) {
                        let sample = mixer.process();
                        for channel_sample in frame.iter_mut() {
                            *channel_sample = T::from_sample(sample);
                        }
                    }
                } else {
                    // Mutex held by the input thread, fill with silence
                    for sample in data.iter_mut() {
                        *sample = T::from_sample(0.0f32);
                    }
                }
            },
            |err| {
                tracing::error!(error = %err, "audio stream error");
            },
            None,
        )?;

        Ok(stream)
    }
}

/// Output devices with their default configuration
pub fn list_output_devices() -> Vec<(String, StreamConfig)> {
    let host = cpal::default_host();
    let mut devices = Vec::new();

    if let Ok(output_devices) = host.output_devices() {
        for device in output_devices {
            if let (Ok(name), Ok(config)) = (device.name(), device.default_output_config()) {
                devices.push((name, config.into()));
            }
        }
    }

    devices
}

/// Get the default output device name
pub fn default_device_name() -> Option<String> {
    let host = cpal::default_host();
    host.default_output_device().and_then(|d| d.name().ok())
}

/// Requested buffer size clamped to what the device accepts; the device
/// default when it does not report a range.
fn buffer_size_for(supported: &SupportedBufferSize, requested: u32) -> BufferSize {
    match supported {
        SupportedBufferSize::Range { min, max } if min <= max => {
            let frames = requested.clamp(*min, *max);
            if frames != requested {
                tracing::warn!(requested, using = frames, "buffer size adjusted for device");
            }
            BufferSize::Fixed(frames)
        }
        _ => BufferSize::Default,
    }
}
