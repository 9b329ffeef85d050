//! Ivory - a keyboard-driven wavetable piano
//!
//! Computer keys become notes, notes become wavetable-synthesized buffers,
//! and buffers are played through a small mixer on the audio device.

pub mod config;
pub mod engine;
pub mod keyboard;
pub mod synth;
pub mod ui;

pub use config::PianoConfig;
pub use engine::Piano;
