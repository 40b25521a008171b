//! Overlay drawing onto a ratatui [`Buffer`].
//!
//! One terminal cell is one unit of overlay geometry. Fractional coordinates
//! round to the nearest cell, so a rectangle covers the cells whose centres
//! it contains. Terminals have no alpha channel: colours are premultiplied
//! over black and font sizes are ignored.

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Paragraph, Widget};
use unicode_width::UnicodeWidthStr;

use crate::core::overlay::{Canvas, RectF, Rgba, TextMeasure};

/// Shown instead of the button label when the label does not fit.
const COMPACT_CANCEL: &str = "✕";

pub(crate) fn wrap_options(width: usize) -> textwrap::Options<'static> {
    textwrap::Options::new(width.max(1))
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
}

pub(crate) fn to_color(color: Rgba) -> Color {
    let channel = |c: f32| (c * color.a).clamp(0.0, 1.0).mul_add(255.0, 0.5) as u8;
    Color::Rgb(channel(color.r), channel(color.g), channel(color.b))
}

pub struct BufferCanvas<'a> {
    buf: &'a mut Buffer,
}

impl<'a> BufferCanvas<'a> {
    pub fn new(buf: &'a mut Buffer) -> Self {
        Self { buf }
    }

    /// The cells `rect` covers, clipped to the buffer. `None` if nothing is left.
    fn cells(&self, rect: RectF) -> Option<Rect> {
        let left = rect.x.round().max(0.0) as u16;
        let top = rect.y.round().max(0.0) as u16;
        let right = (rect.x + rect.width).round().max(0.0) as u16;
        let bottom = (rect.y + rect.height).round().max(0.0) as u16;
        let area = Rect::new(left, top, right.saturating_sub(left), bottom.saturating_sub(top))
            .intersection(self.buf.area);
        (!area.is_empty()).then_some(area)
    }

    fn put_line(&mut self, line: &str, x: f32, y: f32, max_width: f32, color: Rgba) {
        let Some(origin) = self.cells(RectF::new(x, y, max_width, 1.0)) else {
            return;
        };
        let style = Style::default().fg(to_color(color));
        self.buf
            .set_stringn(origin.x, origin.y, line, origin.width as usize, style);
    }
}

impl Canvas for BufferCanvas<'_> {
    fn fill_rect(&mut self, rect: RectF, color: Rgba) {
        if let Some(area) = self.cells(rect) {
            self.buf.set_style(area, Style::default().bg(to_color(color)));
        }
    }

    fn show_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        max_width: f32,
        _font_size: f32,
        color: Rgba,
    ) {
        let line = text.lines().next().unwrap_or("");
        self.put_line(line, x, y, max_width, color);
    }

    fn show_wrapped_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        max_width: f32,
        _font_size: f32,
        color: Rgba,
    ) {
        let width = max_width.round().max(1.0) as usize;
        for (row, line) in textwrap::wrap(text, wrap_options(width)).iter().enumerate() {
            self.put_line(line, x, y + row as f32, max_width, color);
        }
    }

    fn draw_button(&mut self, rect: RectF, label: &str, color: Rgba) {
        let Some(area) = self.cells(rect) else {
            return;
        };
        let inner_width = area.width.saturating_sub(2) as usize;
        let label = if label.width() <= inner_width {
            label
        } else {
            COMPACT_CANCEL
        };
        let style = Style::default().fg(to_color(color));
        let block = Block::bordered().border_style(style);
        let inner = block.inner(area);
        block.render(area, self.buf);
        // Centre the label vertically inside the border.
        let label_row = Rect::new(
            inner.x,
            inner.y + inner.height / 2,
            inner.width,
            inner.height.min(1),
        );
        Paragraph::new(label)
            .style(style)
            .alignment(Alignment::Center)
            .render(label_row, self.buf);
    }
}

/// Measures text in terminal cells with the same wrapping the canvas uses.
#[derive(Debug, Default, Clone, Copy)]
pub struct TermTextMeasure;

impl TextMeasure for TermTextMeasure {
    fn measure_wrapped_text(&self, text: &str, max_width: f32, _font_size: f32) -> (f32, f32) {
        let width = max_width.round().max(1.0) as usize;
        let lines = textwrap::wrap(text, wrap_options(width));
        let widest = lines.iter().map(|l| l.width()).max().unwrap_or(0);
        (widest as f32, lines.len().max(1) as f32)
    }
}
