//! Clickable areas registered while drawing a frame.
//!
//! The overlay registers one region per cancel button; the event loop turns a
//! mouse click into the message of the region under the pointer. Regions are
//! rebuilt every frame, so they always match what is on screen.

use crate::core::message::Message;
use crate::core::overlay::{ClickRegistry, RectF};

#[derive(Debug, Default)]
pub struct HitRegions {
    regions: Vec<(RectF, Message)>,
}

impl HitRegions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.regions.clear();
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Message of the most recently registered region under the cell at
    /// `(col, row)`.
    pub fn hit_test(&self, col: u16, row: u16) -> Option<&Message> {
        // Test the cell centre, matching how the canvas rounds rectangles to cells.
        let (x, y) = (col as f32 + 0.5, row as f32 + 0.5);
        self.regions
            .iter()
            .rev()
            .find(|(rect, _)| rect.contains(x, y))
            .map(|(_, message)| message)
    }
}

impl ClickRegistry for HitRegions {
    fn register(&mut self, rect: RectF, message: Message) {
        self.regions.push((rect, message));
    }
}
