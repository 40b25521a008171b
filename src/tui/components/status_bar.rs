//! # StatusBar Component
//!
//! Bottom line showing how much background work is running and the key
//! bindings.
//!
//! ## Conditional Formatting
//!
//! 1. **Work running**: `"navhud | 2 tasks since 14:03:21 | n tiles ..."`
//! 2. **Idle**: `"navhud | idle | n tiles ..."`
//!
//! The task count comes from the task table and the start time from the
//! work-in-progress indicator, so a forced-on overlay with no tasks reads
//! `0 tasks since ...`.

use chrono::{DateTime, Local};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Span;

use crate::tui::component::Component;

const KEY_HELP: &str = "n tiles  s search  b banner  w overlay  q quit";

/// Stateless status line. All fields are props.
pub struct StatusBar {
    pub task_count: usize,
    /// Start of the current stretch of work; `None` when idle.
    pub work_started: Option<DateTime<Local>>,
}

impl StatusBar {
    pub fn new(task_count: usize, work_started: Option<DateTime<Local>>) -> Self {
        Self {
            task_count,
            work_started,
        }
    }

    pub fn text(&self) -> String {
        match self.work_started {
            Some(started) => {
                let noun = if self.task_count == 1 { "task" } else { "tasks" };
                format!(
                    "navhud | {} {noun} since {} | {KEY_HELP}",
                    self.task_count,
                    started.format("%H:%M:%S")
                )
            }
            None => format!("navhud | idle | {KEY_HELP}"),
        }
    }
}

impl Component for StatusBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Span::raw(self.text()), area);
    }
}
