//! Terminal front end for the piano
//!
//! Provides a TUI showing:
//! - An instruction screen before playing
//! - The keyboard with held keys highlighted
//! - Current octave and waveform
//! - A scope of the active wavetable

mod input;
mod keyboard;
mod scope;

pub use input::{translate, ReleaseTracker};
pub use keyboard::KeyboardView;
pub use scope::Scope;

use std::io::Stdout;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{
        self, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};

use crate::config::KeyboardConfig;
use crate::engine::{AudioOutput, Control, InputEvent, Piano};
use crate::keyboard::{note_name, Key, LAYOUT};

type Tui = Terminal<CrosstermBackend<Stdout>>;

const POLL_INTERVAL: Duration = Duration::from_millis(16);

const INSTRUCTIONS: [&str; 3] = [
    "Hold A S D F G H J K for white notes (C D E F G A B C)",
    "Hold W E   T Y U for black notes (C# D#   F# G# A#)",
    "Z/X to change octave, 1/2/3/4 to change waveform (sine/triangle/square/sawtooth), Esc to exit.",
];

/// Run the interactive piano until the user quits
pub fn run<O: AudioOutput>(
    piano: &mut Piano,
    output: &mut O,
    keyboard: &KeyboardConfig,
) -> Result<()> {
    enable_raw_mode()?;

    with_restore(
        |reports_release| session(piano, output, keyboard, reports_release),
        |reports_release| {
            let mut stdout = std::io::stdout();
            if reports_release {
                execute!(stdout, PopKeyboardEnhancementFlags)?;
            }
            disable_raw_mode()?;
            execute!(stdout, LeaveAlternateScreen)?;
            Ok(())
        },
    )
}

/// Run `body`, then `restore` whatever the outcome. `body` sets the flag
/// once keyboard enhancement is pushed. The first error wins.
fn with_restore<T>(
    body: impl FnOnce(&mut bool) -> Result<T>,
    restore: impl FnOnce(bool) -> Result<()>,
) -> Result<T> {
    let mut reports_release = false;
    let result = body(&mut reports_release);
    let restored = restore(reports_release);
    let value = result?;
    restored?;
    Ok(value)
}

fn session<O: AudioOutput>(
    piano: &mut Piano,
    output: &mut O,
    keyboard: &KeyboardConfig,
    reports_release: &mut bool,
) -> Result<()> {
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    // Key release events need the kitty keyboard protocol
    if supports_keyboard_enhancement().unwrap_or(false) {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        *reports_release = true;
    }
    tracing::info!(reports_release = *reports_release, "terminal input ready");

    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let tracker = (!*reports_release)
        .then(|| ReleaseTracker::new(Duration::from_millis(keyboard.release_timeout_ms)));
    let result = match show_instructions(&mut terminal) {
        Ok(true) => play(&mut terminal, piano, output, tracker),
        other => other.map(|_| ()),
    };
    piano.release_all(output);
    result
}

/// Wait for any key; `false` if the user asked to quit instead
fn show_instructions(terminal: &mut Tui) -> Result<bool> {
    terminal.draw(draw_instructions)?;
    loop {
        if event::poll(POLL_INTERVAL)? {
            match translate(&event::read()?) {
                Some(InputEvent::Quit) => return Ok(false),
                Some(InputEvent::KeyDown(_)) => return Ok(true),
                _ => {}
            }
        }
    }
}

fn play<O: AudioOutput>(
    terminal: &mut Tui,
    piano: &mut Piano,
    output: &mut O,
    mut tracker: Option<ReleaseTracker>,
) -> Result<()> {
    loop {
        terminal.draw(|f| draw_piano(f, piano))?;

        if event::poll(POLL_INTERVAL)? {
            if let Some(input) = translate(&event::read()?) {
                if piano.handle_event(input, output)? == Control::Quit {
                    break;
                }
                if let (Some(tracker), InputEvent::KeyDown(Key::Char(c))) = (&mut tracker, input) {
                    if piano.is_held(c.to_ascii_lowercase()) {
                        tracker.touch(c, Instant::now());
                    }
                }
            }
        }

        if let Some(tracker) = &mut tracker {
            for c in tracker.expired(Instant::now()) {
                piano.key_up(Key::Char(c), output);
            }
        }
    }

    Ok(())
}

fn draw_instructions(f: &mut Frame) {
    let area = f.area();
    let mut lines: Vec<Line> = vec![Line::raw(""); 3];
    for text in INSTRUCTIONS {
        lines.push(Line::styled(text, Style::default().fg(Color::White)));
        lines.push(Line::raw(""));
    }
    lines.push(Line::styled(
        "Press any key to continue...",
        Style::default().fg(Color::Gray),
    ));

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" Ivory "));
    f.render_widget(paragraph, area);
}

fn draw_piano(f: &mut Frame, piano: &Piano) {
    let area = f.area();

    // Layout: HUD on top, keyboard, scope, help at the bottom
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // HUD
            Constraint::Min(6),    // Keyboard
            Constraint::Length(9), // Scope
            Constraint::Length(1), // Help
        ])
        .split(area);

    draw_hud(f, chunks[0], piano);

    let held: Vec<char> = piano.held_notes().keys().copied().collect();
    let keys = KeyboardView::new(&LAYOUT, &held)
        .block(Block::default().borders(Borders::ALL).title(" Ivory "));
    f.render_widget(keys, chunks[1]);

    let table = piano.wavetable();
    let title = format!(
        " {} table, {} samples ",
        piano.waveform().display_name(),
        table.len()
    );
    let scope = Scope::new(table.samples())
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(scope, chunks[2]);

    draw_help(f, chunks[3], piano);
}

fn draw_hud(f: &mut Frame, area: Rect, piano: &Piano) {
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let octave = Paragraph::new(Line::styled(
        format!(" OCTAVE : {}", piano.octave().value()),
        bold,
    ));
    let waveform = Paragraph::new(Line::styled(
        format!("WAVE : {} ", piano.waveform().display_name()),
        bold,
    ))
    .alignment(Alignment::Right);

    f.render_widget(octave, area);
    f.render_widget(waveform, area);
}

fn draw_help(f: &mut Frame, area: Rect, piano: &Piano) {
    let mut notes: Vec<i32> = piano.held_notes().values().map(|n| n.note).collect();
    notes.sort_unstable();
    let playing = notes
        .iter()
        .map(|&n| note_name(n))
        .collect::<Vec<_>>()
        .join(" ");

    let text = Line::from(vec![
        Span::raw("  Playing: "),
        Span::styled(playing, Style::default().fg(Color::Green)),
        Span::raw("  |  "),
        Span::raw("Z/X: octave  |  1-4: waveform  |  Esc: quit"),
    ]);

    f.render_widget(Paragraph::new(text), area);
}
