//! Wavetable scope widget for ratatui

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::{Block, Widget},
};

/// Plots a table of samples in `[-1, 1]`, one point per column
pub struct Scope<'a> {
    samples: &'a [f32],
    style: Style,
    block: Option<Block<'a>>,
}

impl<'a> Scope<'a> {
    pub fn new(samples: &'a [f32]) -> Self {
        Self {
            samples,
            style: Style::default(),
            block: None,
        }
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    /// Row for `value`, +1.0 at the top and -1.0 at the bottom
    fn row(value: f32, height: u16) -> u16 {
        let span = (height - 1) as f32;
        let row = ((1.0 - value.clamp(-1.0, 1.0)) * 0.5 * span).round();
        row as u16
    }

    fn plot(&self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 || self.samples.is_empty() {
            return;
        }

        let zero = area.y + Self::row(0.0, area.height);
        for x in area.x..area.x + area.width {
            buf[(x, zero)].set_char('·');
        }

        let len = self.samples.len();
        for col in 0..area.width {
            // Stretch the table across the full width
            let index = col as usize * len / area.width as usize;
            let y = area.y + Self::row(self.samples[index], area.height);
            buf[(area.x + col, y)].set_char('•').set_style(self.style);
        }
    }
}

impl Widget for Scope<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner_area = match &self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.clone().render(area, buf);
                inner
            }
            None => area,
        };

        self.plot(inner_area, buf);
    }
}
