//! CLI interface for Ivory

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Keyboard-driven wavetable piano
#[derive(Parser)]
#[command(name = "ivory")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Play the piano in the terminal
    Play {
        /// Configuration file path (defaults are used if it does not exist)
        #[arg(short, long, default_value = "ivory.yaml")]
        config: PathBuf,

        /// Write logs to this file while the piano is on screen
        #[arg(long)]
        log_file: Option<PathBuf>,
    },

    /// Render a key sequence to a WAV file
    Render {
        /// Configuration file path (defaults are used if it does not exist)
        #[arg(short, long, default_value = "ivory.yaml")]
        config: PathBuf,

        /// Keys to press in order, e.g. "asdf x a"; '.' rests for one step
        #[arg(short, long)]
        keys: String,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Seconds each key is held
        #[arg(long, default_value = "0.5")]
        hold: f64,

        /// Starting octave (overrides the configuration)
        #[arg(long)]
        octave: Option<u8>,

        /// Starting waveform: sine, triangle, square or sawtooth
        #[arg(short, long)]
        waveform: Option<String>,
    },

    /// List available audio output devices
    Devices,

    /// Validate a configuration file
    Check {
        /// Configuration file path
        #[arg(short, long, default_value = "ivory.yaml")]
        config: PathBuf,
    },

    /// Generate an example configuration file
    Init,
}
