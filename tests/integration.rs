//! End-to-end checks through the public API

use std::sync::Arc;

use ivory::config::PianoConfig;
use ivory::engine::{render_script, AudioOutput, Mixer, Piano, Recorder};
use ivory::keyboard::{midi_to_freq, note_number, Key, Octave, LAYOUT};
use ivory::synth::{generate, Voice, Waveform, WavetableOscillator};
use tempfile::NamedTempFile;

#[test]
fn test_key_to_buffer_pipeline() {
    let sample_rate = 44100.0;
    let table = Arc::new(generate(64, Waveform::Sine, 440.0, sample_rate).unwrap());
    let mut voice = Voice::new(sample_rate, -10.0);
    voice.set_oscillators(vec![WavetableOscillator::new(table, sample_rate)]);

    let key = LAYOUT.piano_key('h').unwrap();
    let note = note_number(Octave::new(5), key.offset);
    assert_eq!(note, 69);

    let buffer = voice.synthesize(midi_to_freq(note), 1.0).unwrap();
    assert_eq!(buffer.len(), 44100);

    let peak = buffer.iter().fold(0.0f32, |p, s| p.max(s.abs()));
    let amplitude = 10f32.powf(-0.5);
    assert!(peak <= amplitude + 1e-5);
    assert!(peak > amplitude * 0.9);
    assert_eq!(*buffer.last().unwrap(), 0.0);
}

#[test]
fn test_piano_plays_into_mixer() {
    let mut config = PianoConfig::default();
    config.audio.sample_rate = 8000;
    config.synth.note_duration = 0.5;
    let mut piano = Piano::new(&config).unwrap();
    let mut mixer = Mixer::new(8000);

    piano.key_down(Key::Char('a'), &mut mixer).unwrap();
    piano.key_down(Key::Char('g'), &mut mixer).unwrap();
    assert_eq!(mixer.active_count(), 2);

    let mut out = vec![0.0; 400];
    mixer.fill_buffer(&mut out);
    assert!(out.iter().any(|s| s.abs() > 0.05));

    piano.key_up(Key::Char('a'), &mut mixer);
    piano.key_up(Key::Char('g'), &mut mixer);
    let mut tail = vec![0.0; 8000];
    mixer.fill_buffer(&mut tail);
    assert!(mixer.is_idle());
    assert!(tail[2000..].iter().all(|&s| s == 0.0));
}

#[test]
fn test_switching_waveform_keeps_playing_notes() {
    let mut config = PianoConfig::default();
    config.audio.sample_rate = 8000;
    config.synth.note_duration = 0.2;
    let mut piano = Piano::new(&config).unwrap();
    let mut mixer = Mixer::new(8000);

    piano.key_down(Key::Char('a'), &mut mixer).unwrap();
    let handle = piano.held_notes()[&'a'].handle;
    piano.key_down(Key::Char('3'), &mut mixer).unwrap();

    assert_eq!(piano.waveform(), Waveform::Square);
    assert!(mixer.is_playing(handle));
    mixer.fade_out(handle, 0);
    assert!(mixer.is_idle());
}

#[test]
fn test_render_script_to_wav() {
    let mut config = PianoConfig::default();
    config.audio.sample_rate = 8000;
    config.synth.note_duration = 0.5;
    config.keyboard.fade_out_ms = 50;
    let mut piano = Piano::new(&config).unwrap();

    let samples = render_script(&mut piano, "a s d . 2 f", 0.1).unwrap();
    // Five steps plus the last 50 ms fade
    assert_eq!(samples.len(), 5 * 800 + 400);

    let file = NamedTempFile::new().unwrap();
    let mut recorder = Recorder::new(file.path(), 8000, 2).unwrap();
    recorder.write_buffer(&samples).unwrap();
    recorder.finalize().unwrap();

    let reader = hound::WavReader::open(file.path()).unwrap();
    assert_eq!(reader.spec().channels, 2);
    assert_eq!(reader.len() as usize, samples.len() * 2);
}
