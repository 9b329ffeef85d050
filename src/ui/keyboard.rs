//! Piano keyboard widget for ratatui

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Widget},
};

use crate::keyboard::{KeyboardLayout, PianoKey};

const HELD: Color = Color::Cyan;

/// Draws one octave of keys, highlighting the held ones
pub struct KeyboardView<'a> {
    layout: &'a KeyboardLayout,
    held: &'a [char],
    block: Option<Block<'a>>,
}

impl<'a> KeyboardView<'a> {
    pub fn new(layout: &'a KeyboardLayout, held: &'a [char]) -> Self {
        Self {
            layout,
            held,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    fn is_held(&self, key: &PianoKey) -> bool {
        self.held.contains(&key.key)
    }

    fn render_keys(&self, area: Rect, buf: &mut Buffer) {
        let whites = self.layout.white_keys.len() as u16;
        if area.width < whites || area.height < 3 {
            return;
        }

        let key_width = area.width / whites;
        let bottom = area.y + area.height - 1;

        for (i, key) in self.layout.white_keys.iter().enumerate() {
            let x0 = area.x + i as u16 * key_width;
            let bg = if self.is_held(key) { HELD } else { Color::White };
            let style = Style::default().fg(Color::Black).bg(bg);

            for x in x0..x0 + key_width {
                for y in area.y..=bottom {
                    let symbol = if x == x0 && i > 0 { '│' } else { ' ' };
                    buf[(x, y)].set_char(symbol).set_style(style);
                }
            }

            let center = x0 + key_width / 2;
            buf[(center, bottom)].set_char(key.key.to_ascii_uppercase());
            if area.height >= 4 {
                buf.set_string(center, bottom - 1, key.label, style);
            }
        }

        let black_height = (area.height * 3 / 5).max(1);
        let black_width = (key_width / 2).max(1);
        for key in &self.layout.black_keys {
            // Sits on the boundary after the white key one semitone below
            let Some(left) = self
                .layout
                .white_keys
                .iter()
                .position(|w| w.offset + 1 == key.offset)
            else {
                continue;
            };

            let boundary = area.x + (left as u16 + 1) * key_width;
            let x0 = boundary - black_width / 2;
            let bg = if self.is_held(key) { HELD } else { Color::Black };
            let style = Style::default().fg(Color::White).bg(bg);

            for x in x0..(x0 + black_width).min(area.x + area.width) {
                for y in area.y..area.y + black_height {
                    buf[(x, y)].set_char(' ').set_style(style);
                }
            }
            buf[(boundary, area.y + black_height - 1)].set_char(key.key.to_ascii_uppercase());
        }
    }
}

impl Widget for KeyboardView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner_area = match &self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.clone().render(area, buf);
                inner
            }
            None => area,
        };

        self.render_keys(inner_area, buf);
    }
}
