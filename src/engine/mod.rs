//! Audio engine for Ivory
//!
//! Connects the piano to audio output: the mixer that plays rendered
//! notes, the cpal player, offline rendering and WAV recording.

mod mixer;
mod output;
mod piano;
mod player;
mod recorder;
mod render;

pub use mixer::Mixer;
pub use output::{sample_to_i16, AudioOutput, SoundHandle};
pub use piano::{Control, HeldNote, InputEvent, Piano};
pub use player::{default_device_name, list_output_devices, Player};
pub use recorder::Recorder;
pub use render::{render_script, REST};
