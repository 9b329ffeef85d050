//! Offline rendering of a keystroke script
//!
//! Replays keys through the same [`Piano`] and [`Mixer`] the live player
//! uses, holding each key for a fixed time before releasing it.

use anyhow::{bail, Result};

use super::{Mixer, Piano};
use crate::keyboard::Key;

/// Key in a script that holds silence for one step
pub const REST: char = '.';

/// Render `script` to a mono buffer.
///
/// Each character is pressed, held for `hold_seconds` and released.
/// Octave and waveform keys take effect without consuming time, `.` rests
/// for one step and whitespace is ignored. After the last key the output
/// runs until every fade has finished.
pub fn render_script(piano: &mut Piano, script: &str, hold_seconds: f64) -> Result<Vec<f32>> {
    if !hold_seconds.is_finite() || hold_seconds <= 0.0 {
        bail!("Hold time must be positive, got {}", hold_seconds);
    }

    let sample_rate = piano.sample_rate();
    let step = (hold_seconds * sample_rate).round() as usize;
    let mut mixer = Mixer::new(sample_rate as u32);
    let mut output = Vec::new();

    for c in script.chars().filter(|c| !c.is_whitespace()) {
        if c == REST {
            output.extend((0..step).map(|_| mixer.process()));
            continue;
        }

        let key = Key::Char(c);
        let sounding = piano.held_notes().len();
        piano.key_down(key, &mut mixer)?;
        if piano.held_notes().len() == sounding {
            // Control key or unmapped key
            continue;
        }

        output.extend((0..step).map(|_| mixer.process()));
        piano.key_up(key, &mut mixer);
    }

    while !mixer.is_idle() {
        output.push(mixer.process());
    }

    tracing::info!(samples = output.len(), "rendered script");
    Ok(output)
}
