//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::core::clock::Clock;
use crate::core::message::Message;
use crate::core::overlay::{Canvas, ClickRegistry, RectF, Rgba, TextMeasure};
use crate::core::tasks::ThreadManager;

/// A clock that only moves when told to.
pub struct ManualClock {
    start: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.offset.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.start + *self.offset.lock().unwrap()
    }
}

/// A thread manager that remembers what it was asked to cancel.
#[derive(Default)]
pub struct RecordingThreads {
    cancelled: Mutex<Vec<String>>,
}

impl RecordingThreads {
    pub fn cancelled(&self) -> Vec<String> {
        self.cancelled.lock().unwrap().clone()
    }
}

impl ThreadManager for RecordingThreads {
    fn cancel(&self, name: &str) -> bool {
        self.cancelled.lock().unwrap().push(name.to_string());
        false
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Fill(RectF, Rgba),
    Text(String, f32, f32),
    WrappedText(String, f32, f32),
    Button(RectF, String),
}

/// A canvas that records every call.
#[derive(Default)]
pub struct RecordingCanvas {
    pub ops: Vec<DrawOp>,
}

impl RecordingCanvas {
    pub fn buttons(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Button(..)))
            .count()
    }
}

impl Canvas for RecordingCanvas {
    fn fill_rect(&mut self, rect: RectF, color: Rgba) {
        self.ops.push(DrawOp::Fill(rect, color));
    }

    fn show_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        _max_width: f32,
        _font_size: f32,
        _color: Rgba,
    ) {
        self.ops.push(DrawOp::Text(text.to_string(), x, y));
    }

    fn show_wrapped_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        _max_width: f32,
        _font_size: f32,
        _color: Rgba,
    ) {
        self.ops.push(DrawOp::WrappedText(text.to_string(), x, y));
    }

    fn draw_button(&mut self, rect: RectF, label: &str, _color: Rgba) {
        self.ops.push(DrawOp::Button(rect, label.to_string()));
    }
}

/// Monospace measurement: every char is `char_width` wide, every line
/// `line_height` tall, wrapping by character count.
pub struct FixedMeasure {
    char_width: f32,
    line_height: f32,
}

impl FixedMeasure {
    pub fn new(char_width: f32, line_height: f32) -> Self {
        Self {
            char_width,
            line_height,
        }
    }
}

impl TextMeasure for FixedMeasure {
    fn measure_wrapped_text(&self, text: &str, max_width: f32, _font_size: f32) -> (f32, f32) {
        let per_line = ((max_width / self.char_width).floor() as usize).max(1);
        let chars = text.chars().count();
        let lines = chars.div_ceil(per_line).max(1);
        let width = chars.min(per_line) as f32 * self.char_width;
        (width, lines as f32 * self.line_height)
    }
}

#[derive(Default)]
pub struct RecordingClicks {
    pub regions: Vec<(RectF, Message)>,
}

impl ClickRegistry for RecordingClicks {
    fn register(&mut self, rect: RectF, message: Message) {
        self.regions.push((rect, message));
    }
}
