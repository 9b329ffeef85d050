//! Terminal events to piano input events

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};

use crate::engine::InputEvent;
use crate::keyboard::Key;

/// Translate a crossterm event, ignoring anything the piano does not use
pub fn translate(event: &Event) -> Option<InputEvent> {
    let Event::Key(key) = event else {
        return None;
    };

    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(InputEvent::Quit);
    }

    let mapped = match key.code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Esc => Key::Escape,
        _ => return None,
    };

    match key.kind {
        KeyEventKind::Press | KeyEventKind::Repeat => Some(InputEvent::KeyDown(mapped)),
        KeyEventKind::Release => Some(InputEvent::KeyUp(mapped)),
    }
}

/// Synthesizes key releases for terminals that only report presses.
///
/// A held key is considered released once no press or auto-repeat for it
/// has arrived within the timeout.
pub struct ReleaseTracker {
    timeout: Duration,
    last_seen: HashMap<char, Instant>,
}

impl ReleaseTracker {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            last_seen: HashMap::new(),
        }
    }

    /// Record a press or repeat of `key`
    pub fn touch(&mut self, key: char, now: Instant) {
        self.last_seen.insert(key.to_ascii_lowercase(), now);
    }

    /// Remove and return the keys whose timeout has elapsed
    pub fn expired(&mut self, now: Instant) -> Vec<char> {
        let timeout = self.timeout;
        let expired: Vec<char> = self
            .last_seen
            .iter()
            .filter(|(_, seen)| now.duration_since(**seen) >= timeout)
            .map(|(key, _)| *key)
            .collect();
        for key in &expired {
            self.last_seen.remove(key);
        }
        expired
    }
}
