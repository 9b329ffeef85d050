//! Ivory - keyboard-driven wavetable piano

use std::fs::File;
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use ivory::config::{self, PianoConfig};
use ivory::engine::{self, Mixer, Piano, Player, Recorder};
use ivory::synth::Waveform;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{Cli, Commands};

/// Stderr logging by default. While the TUI owns the terminal, logs go to
/// `log_file` or nowhere.
fn init_logging(interactive: bool, log_file: Option<&Path>) -> Result<()> {
    let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());

    match (interactive, log_file) {
        (_, Some(path)) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file: {:?}", path))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter())
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        (true, None) => {}
        (false, None) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter())
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Play {
            config: config_path,
            log_file,
        } => {
            init_logging(true, log_file.as_deref())?;
            let mut cfg = config::load_or_default(&config_path)?;

            let mut player = Player::open(&cfg.audio)?;
            cfg.audio.sample_rate = player.sample_rate();

            let mut piano = Piano::new(&cfg)?;
            let mut mixer = Arc::new(Mutex::new(Mixer::new(player.sample_rate())));
            player.start(Arc::clone(&mixer))?;

            ivory::ui::run(&mut piano, &mut mixer, &cfg.keyboard)?;
            player.stop();
        }

        Commands::Render {
            config: config_path,
            keys,
            output,
            hold,
            octave,
            waveform,
        } => {
            init_logging(false, None)?;
            let mut cfg = config::load_or_default(&config_path)?;
            if let Some(octave) = octave {
                cfg.keyboard.base_octave = octave;
            }
            if let Some(name) = waveform {
                cfg.synth.waveform = name.parse::<Waveform>()?;
            }
            cfg.validate()?;

            let mut piano = Piano::new(&cfg)?;
            let samples = engine::render_script(&mut piano, &keys, hold)?;

            let mut recorder = Recorder::new(&output, cfg.audio.sample_rate, 2)?;
            recorder.write_buffer(&samples)?;
            let seconds = recorder.duration_secs();
            recorder.finalize()?;
            println!("Rendered {:.2}s to {:?}", seconds, output);
        }

        Commands::Devices => {
            init_logging(false, None)?;
            println!("Available audio devices:\n");

            if let Some(name) = engine::default_device_name() {
                println!("Default output: {}\n", name);
            }

            println!("Output devices:");
            for (name, config) in engine::list_output_devices() {
                println!(
                    "  - {} ({} Hz, {} ch)",
                    name, config.sample_rate.0, config.channels
                );
            }
        }

        Commands::Check {
            config: config_path,
        } => {
            init_logging(false, None)?;
            println!("Checking configuration at {:?}...", config_path);

            match config::load_config(&config_path) {
                Ok(cfg) => {
                    println!("Configuration is valid!");
                    print_summary(&cfg);
                }
                Err(e) => {
                    println!("Configuration is invalid: {:#}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Init => {
            let example_config = include_str!("../ivory.example.yaml");

            let path = "ivory.yaml";
            if std::path::Path::new(path).exists() {
                println!("ivory.yaml already exists. Not overwriting.");
            } else {
                std::fs::write(path, example_config)?;
                println!("Created ivory.yaml with example configuration.");
            }
        }
    }

    Ok(())
}

fn print_summary(cfg: &PianoConfig) {
    println!("  Sample rate: {} Hz", cfg.audio.sample_rate);
    println!("  Buffer size: {}", cfg.audio.buffer_size);
    println!(
        "  Device: {}",
        cfg.audio.device.as_deref().unwrap_or("(default)")
    );
    println!("  Wavetable size: {}", cfg.synth.wavetable_size);
    println!("  Reference frequency: {} Hz", cfg.synth.reference_frequency);
    println!("  Gain: {} dB", cfg.synth.gain_db);
    println!("  Note duration: {} s", cfg.synth.note_duration);
    println!("  Interpolation: {:?}", cfg.synth.interpolation);
    println!("  Unison: {}", cfg.synth.unison);
    println!("  Waveform: {}", cfg.synth.waveform);
    println!("  Base octave: {}", cfg.keyboard.base_octave);
    println!(
        "  Fades: in {} ms, out {} ms",
        cfg.keyboard.fade_in_ms, cfg.keyboard.fade_out_ms
    );
}
