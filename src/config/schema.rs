//! Configuration schema definitions

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::keyboard::{MAX_OCTAVE, MIN_OCTAVE};
use crate::synth::{InterpolationMode, Waveform};

/// Main configuration for Ivory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PianoConfig {
    /// Audio output settings
    #[serde(default)]
    pub audio: AudioConfig,

    /// Wavetable and voice settings
    #[serde(default)]
    pub synth: SynthConfig,

    /// Key handling settings
    #[serde(default)]
    pub keyboard: KeyboardConfig,
}

impl PianoConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        // Validate audio settings
        if self.audio.sample_rate < 8000 || self.audio.sample_rate > 192000 {
            bail!("Sample rate must be between 8000 and 192000");
        }
        if self.audio.buffer_size < 64 || self.audio.buffer_size > 8192 {
            bail!("Buffer size must be between 64 and 8192");
        }

        // Validate synth settings
        let nyquist = self.audio.sample_rate as f64 / 2.0;
        for (name, value) in [
            ("Reference frequency", self.synth.reference_frequency),
            ("Gain", self.synth.gain_db),
            ("Note duration", self.synth.note_duration),
        ] {
            if !value.is_finite() {
                bail!("{} must be a finite number", name);
            }
        }
        if self.synth.wavetable_size < 2 {
            bail!("Wavetable size must be at least 2");
        }
        if self.synth.reference_frequency <= 0.0 || self.synth.reference_frequency >= nyquist {
            bail!("Reference frequency must be between 0 and {} Hz", nyquist);
        }
        if self.synth.gain_db > 0.0 {
            bail!("Gain must not exceed 0 dB");
        }
        if self.synth.note_duration <= 0.0 || self.synth.note_duration > 60.0 {
            bail!("Note duration must be between 0 and 60 seconds");
        }
        if self.synth.unison == 0 || self.synth.unison > 8 {
            bail!("Unison must be between 1 and 8 oscillators");
        }

        // Validate keyboard settings
        if self.keyboard.base_octave < MIN_OCTAVE || self.keyboard.base_octave > MAX_OCTAVE {
            bail!("Base octave must be between {} and {}", MIN_OCTAVE, MAX_OCTAVE);
        }

        Ok(())
    }
}

/// Audio output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Sample rate in Hz (default: 44100)
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Buffer size in frames (default: 1024)
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,

    /// Output device name (None = default device)
    pub device: Option<String>,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            buffer_size: default_buffer_size(),
            device: None,
        }
    }
}

fn default_sample_rate() -> u32 { 44100 }
fn default_buffer_size() -> usize { 1024 }

/// Wavetable and voice configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthConfig {
    /// Samples per wavetable (default: 64)
    #[serde(default = "default_wavetable_size")]
    pub wavetable_size: usize,

    /// Frequency the tables are generated at (default: 440)
    #[serde(default = "default_reference_frequency")]
    pub reference_frequency: f64,

    /// Voice gain in dB (default: -10)
    #[serde(default = "default_gain_db")]
    pub gain_db: f64,

    /// Length of each rendered note in seconds (default: 5)
    #[serde(default = "default_note_duration")]
    pub note_duration: f64,

    /// Tail fade length in samples (default: 1000)
    #[serde(default = "default_fade_length")]
    pub fade_length: usize,

    /// Table lookup strategy (default: linear)
    #[serde(default)]
    pub interpolation: InterpolationMode,

    /// Oscillators summed per voice (default: 1)
    #[serde(default = "default_unison")]
    pub unison: usize,

    /// Waveform selected at startup (default: sine)
    #[serde(default = "default_waveform")]
    pub waveform: Waveform,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            wavetable_size: default_wavetable_size(),
            reference_frequency: default_reference_frequency(),
            gain_db: default_gain_db(),
            note_duration: default_note_duration(),
            fade_length: default_fade_length(),
            interpolation: InterpolationMode::default(),
            unison: default_unison(),
            waveform: default_waveform(),
        }
    }
}

fn default_wavetable_size() -> usize { 64 }
fn default_reference_frequency() -> f64 { 440.0 }
fn default_gain_db() -> f64 { -10.0 }
fn default_note_duration() -> f64 { 5.0 }
fn default_fade_length() -> usize { crate::synth::DEFAULT_FADE_LENGTH }
fn default_unison() -> usize { 1 }
fn default_waveform() -> Waveform { Waveform::Sine }

/// Key handling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyboardConfig {
    /// Octave at startup (default: 3)
    #[serde(default = "default_base_octave")]
    pub base_octave: u8,

    /// Fade-in requested when a note starts, in ms (default: 5)
    #[serde(default = "default_fade_in_ms")]
    pub fade_in_ms: u32,

    /// Fade-out requested when a key is released, in ms (default: 150)
    #[serde(default = "default_fade_out_ms")]
    pub fade_out_ms: u32,

    /// Hold time without auto-repeat after which a key counts as released,
    /// used when the terminal cannot report key releases (default: 600)
    #[serde(default = "default_release_timeout_ms")]
    pub release_timeout_ms: u64,
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            base_octave: default_base_octave(),
            fade_in_ms: default_fade_in_ms(),
            fade_out_ms: default_fade_out_ms(),
            release_timeout_ms: default_release_timeout_ms(),
        }
    }
}

fn default_base_octave() -> u8 { 3 }
fn default_fade_in_ms() -> u32 { 5 }
fn default_fade_out_ms() -> u32 { 150 }
fn default_release_timeout_ms() -> u64 { 600 }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_audio_config() {
        let yaml = "sample_rate: 48000";
        let config: AudioConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.sample_rate, 48000);
        assert_eq!(config.buffer_size, 1024); // default
    }

    #[test]
    fn test_synth_config() {
        let yaml = r#"
wavetable_size: 256
gain_db: -6
interpolation: cubic
waveform: square
unison: 2
"#;
        let config: SynthConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.wavetable_size, 256);
        assert_eq!(config.gain_db, -6.0);
        assert_eq!(config.interpolation, InterpolationMode::Cubic);
        assert_eq!(config.waveform, Waveform::Square);
        assert_eq!(config.unison, 2);
        assert_eq!(config.note_duration, 5.0); // default
    }

    #[test]
    fn test_unknown_waveform_rejected() {
        let yaml = "waveform: noise";
        assert!(serde_yaml::from_str::<SynthConfig>(yaml).is_err());
    }

    #[test]
    fn test_keyboard_config() {
        let yaml = r#"
base_octave: 5
fade_out_ms: 300
"#;
        let config: KeyboardConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.base_octave, 5);
        assert_eq!(config.fade_out_ms, 300);
        assert_eq!(config.fade_in_ms, 5);
    }

    #[test]
    fn test_config_validation() {
        let config = PianoConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_settings() {
        let mut config = PianoConfig::default();
        config.keyboard.base_octave = 8;
        assert!(config.validate().is_err());

        let mut config = PianoConfig::default();
        config.synth.reference_frequency = 30000.0;
        assert!(config.validate().is_err());

        let mut config = PianoConfig::default();
        config.synth.note_duration = 0.0;
        assert!(config.validate().is_err());

        let mut config = PianoConfig::default();
        config.synth.unison = 0;
        assert!(config.validate().is_err());

        let mut config = PianoConfig::default();
        config.synth.gain_db = 3.0;
        assert!(config.validate().is_err());

        let mut config = PianoConfig::default();
        config.audio.sample_rate = 4000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_finite_settings_rejected() {
        for yaml in [
            "synth: { gain_db: .nan, note_duration: 0.1 }",
            "synth: { note_duration: .nan }",
            "synth: { reference_frequency: .nan }",
            "synth: { gain_db: -.inf }",
        ] {
            let config: PianoConfig = serde_yaml::from_str(yaml).unwrap();
            let err = config.validate().unwrap_err();
            assert!(err.to_string().contains("finite"), "{yaml}: {err}");
        }
    }
}
