//! # Overlay Renderer
//!
//! Draws the heads-up layer on top of whatever the application shows: the
//! transient banner and, while background work is running, the
//! work-in-progress table with a cancel button per task.
//!
//! ```text
//! ┌──────────────────────────────────────┬──────┐  ─┐
//! │ tile fetch: 3/8 (37%)                │  ✕   │   │ 0.2·h per task
//! ├──────────────────────────────────────┼──────┤   │
//! │ search "coffee"                      │  ✕   │   │
//! └──────────────────────────────────────┴──────┘  ─┘
//!
//!              ┌──────────────────┐
//!              │  Route found     │   banner, sized to its text and
//!              └──────────────────┘   centred in the viewport
//! ```
//!
//! The renderer knows nothing about the backend. Drawing, text measurement
//! and click registration are separate collaborators, any of which may be
//! missing; a missing collaborator means the element that needs it is not
//! drawn at all.

use crate::core::message::Message;
use crate::core::notification::Notifications;
use crate::core::tasks::TaskSnapshot;

/// Share of the viewport height one task row takes.
pub const TASK_ROW_FRACTION: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectF {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl RectF {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

/// The visible drawing area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Padding around overlay text.
    pub fn border(&self) -> f32 {
        self.width.min(self.height) / 20.0
    }

    /// Side length of a square cancel button.
    pub fn button_side(&self) -> f32 {
        self.width.min(self.height) / 5.0
    }

    pub fn row_height(&self) -> f32 {
        self.height * TASK_ROW_FRACTION
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);
    pub const RED: Rgba = Rgba::new(1.0, 0.0, 0.0, 1.0);
}

/// A 2D surface the overlay draws on.
pub trait Canvas {
    fn fill_rect(&mut self, rect: RectF, color: Rgba);
    /// Single line of text, clipped to `max_width`.
    fn show_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        max_width: f32,
        font_size: f32,
        color: Rgba,
    );
    /// Text wrapped to `max_width`.
    fn show_wrapped_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        max_width: f32,
        font_size: f32,
        color: Rgba,
    );
    fn draw_button(&mut self, rect: RectF, label: &str, color: Rgba);
}

pub trait TextMeasure {
    /// Size of `text` once wrapped to `max_width`, as `(width, height)`.
    fn measure_wrapped_text(&self, text: &str, max_width: f32, font_size: f32) -> (f32, f32);
}

/// Where clickable areas are registered. Activating an area emits its message.
pub trait ClickRegistry {
    fn register(&mut self, rect: RectF, message: Message);
}

/// Everything the renderer needs besides the canvas. `None` fields are
/// collaborators that are not available this frame.
#[derive(Default)]
pub struct Collaborators<'a> {
    pub viewport: Option<Viewport>,
    pub measure: Option<&'a dyn TextMeasure>,
    pub clicks: Option<&'a mut dyn ClickRegistry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayStyle {
    pub font_size: f32,
    pub banner_color: Rgba,
    pub band_color: Rgba,
    pub text_color: Rgba,
    pub cancel_label: String,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            font_size: 30.0,
            banner_color: Rgba::new(0.0, 0.0, 1.0, 0.45),
            band_color: Rgba::new(0.5, 0.5, 1.0, 0.5),
            text_color: Rgba::WHITE,
            cancel_label: "cancel".to_string(),
        }
    }
}

pub struct OverlayRenderer {
    pub style: OverlayStyle,
}

impl OverlayRenderer {
    pub fn new(style: OverlayStyle) -> Self {
        Self { style }
    }

    /// Banner first, then the task table if the work-in-progress indicator
    /// is on.
    pub fn draw_master_overlay(
        &self,
        hub: &Notifications,
        canvas: &mut dyn Canvas,
        env: &mut Collaborators<'_>,
    ) {
        if let Some(text) = hub.banner().visible_text(hub.now()) {
            self.draw_banner(&text, canvas, env);
        }
        if hub.tasks().is_wip_active() {
            self.draw_task_table(&hub.tasks().snapshot(), canvas, env);
        }
    }

    pub fn draw_banner(&self, text: &str, canvas: &mut dyn Canvas, env: &Collaborators<'_>) {
        let (Some(viewport), Some(measure)) = (env.viewport, env.measure) else {
            return;
        };
        let Viewport { x, y, width: w, height: h } = viewport;
        let border = viewport.border();
        let font_size = self.style.font_size;

        let (text_w, text_h) = measure.measure_wrapped_text(text, w - 2.0 * border, font_size);
        let box_w = text_w + 2.0 * border;
        let box_h = text_h + 2.0 * border;
        let box_x = x + (w - box_w) / 2.0;
        let box_y = y + (h - box_h) / 2.0;

        canvas.fill_rect(RectF::new(box_x, box_y, box_w, box_h), self.style.banner_color);
        canvas.show_wrapped_text(
            text,
            box_x + border,
            box_y + border,
            text_w,
            font_size,
            self.style.text_color,
        );
    }

    pub fn draw_task_table(
        &self,
        tasks: &TaskSnapshot,
        canvas: &mut dyn Canvas,
        env: &mut Collaborators<'_>,
    ) {
        if tasks.is_empty() {
            return;
        }
        let (Some(viewport), Some(_)) = (env.viewport, env.measure) else {
            return;
        };
        let Viewport { x, y, width: w, .. } = viewport;
        let row_h = viewport.row_height();
        let side = viewport.button_side();
        let border = viewport.border();

        let band = RectF::new(x, y, w, row_h * tasks.len() as f32);
        canvas.fill_rect(band, self.style.band_color);

        for (index, (name, task)) in tasks.iter().enumerate() {
            let button = RectF::new(x + w - side, y + side * index as f32, side, side);
            self.draw_cancel_button(button, name, canvas, env);

            canvas.show_text(
                &task.label(),
                x + border,
                y + border + row_h * index as f32,
                w - 2.0 * border - side,
                self.style.font_size,
                self.style.text_color,
            );
        }
    }

    fn draw_cancel_button(
        &self,
        rect: RectF,
        task_name: &str,
        canvas: &mut dyn Canvas,
        env: &mut Collaborators<'_>,
    ) {
        let Some(clicks) = env.clicks.as_deref_mut() else {
            return;
        };
        canvas.draw_button(rect, &self.style.cancel_label, Rgba::RED);
        clicks.register(rect, Message::cancel_task(task_name));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::Clock;
    use crate::core::tasks::TaskTable;
    use crate::test_support::{DrawOp, FixedMeasure, ManualClock, RecordingCanvas, RecordingClicks};
    use std::sync::Arc;
    use std::time::Duration;

    fn hub() -> (Notifications, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let tasks = Arc::new(TaskTable::new(None));
        let hub = Notifications::new(tasks, clock.clone(), Duration::from_secs(5), false);
        (hub, clock)
    }

    fn viewport() -> Viewport {
        Viewport::new(0.0, 0.0, 800.0, 500.0)
    }

    #[test]
    fn test_three_tasks_layout() {
        let (hub, _) = hub();
        for name in ["a", "b", "c"] {
            hub.tasks().set_status(name, Some("working"));
        }
        let renderer = OverlayRenderer::new(OverlayStyle::default());
        let mut canvas = RecordingCanvas::default();
        let mut clicks = RecordingClicks::default();
        let measure = FixedMeasure::new(8.0, 20.0);
        let mut env = Collaborators {
            viewport: Some(viewport()),
            measure: Some(&measure),
            clicks: Some(&mut clicks),
        };
        renderer.draw_master_overlay(&hub, &mut canvas, &mut env);

        let side = 100.0; // min(800, 500) / 5
        let ys: Vec<f32> = clicks.regions.iter().map(|(r, _)| r.y).collect();
        assert_eq!(ys, vec![0.0, side, 2.0 * side]);
        assert!(clicks.regions.iter().all(|(r, _)| r.x == 700.0 && r.width == side));
        assert_eq!(clicks.regions[1].1, Message::cancel_task("b"));

        match &canvas.ops[0] {
            DrawOp::Fill(rect, _) => {
                assert!((rect.height - 3.0 * 0.2 * 500.0).abs() < 1e-3);
                assert_eq!(rect.width, 800.0);
            }
            other => panic!("expected band fill, got {other:?}"),
        }
        assert_eq!(canvas.buttons(), 3);
    }

    #[test]
    fn test_banner_is_centred_and_sized_to_text() {
        let (hub, _) = hub();
        hub.notify("hello", Duration::from_secs(1));
        let renderer = OverlayRenderer::new(OverlayStyle::default());
        let mut canvas = RecordingCanvas::default();
        let measure = FixedMeasure::new(10.0, 30.0);
        let mut env = Collaborators {
            viewport: Some(viewport()),
            measure: Some(&measure),
            clicks: None,
        };
        renderer.draw_master_overlay(&hub, &mut canvas, &mut env);

        // border = 25, text = 50 x 30
        let DrawOp::Fill(rect, _) = &canvas.ops[0] else {
            panic!("expected banner fill");
        };
        assert_eq!(*rect, RectF::new(350.0, 210.0, 100.0, 80.0));
        assert!(matches!(
            &canvas.ops[1],
            DrawOp::WrappedText(text, x, y) if text == "hello" && *x == 375.0 && *y == 235.0
        ));
    }

    #[test]
    fn test_long_banner_still_centred() {
        let (hub, _) = hub();
        hub.notify(&"x".repeat(500), Duration::from_secs(1));
        let renderer = OverlayRenderer::new(OverlayStyle::default());
        let mut canvas = RecordingCanvas::default();
        let measure = FixedMeasure::new(10.0, 30.0);
        let mut env = Collaborators {
            viewport: Some(viewport()),
            measure: Some(&measure),
            clicks: None,
        };
        renderer.draw_master_overlay(&hub, &mut canvas, &mut env);
        let DrawOp::Fill(rect, _) = &canvas.ops[0] else {
            panic!("expected banner fill");
        };
        let left = rect.x;
        let right = 800.0 - (rect.x + rect.width);
        assert!((left - right).abs() < 0.01);
        assert!(rect.width <= 800.0);
    }

    #[test]
    fn test_expired_banner_draws_nothing() {
        let (hub, clock) = hub();
        hub.notify("gone", Duration::from_millis(100));
        clock.advance(Duration::from_millis(101));
        let renderer = OverlayRenderer::new(OverlayStyle::default());
        let mut canvas = RecordingCanvas::default();
        let measure = FixedMeasure::new(10.0, 30.0);
        let mut env = Collaborators {
            viewport: Some(viewport()),
            measure: Some(&measure),
            clicks: None,
        };
        renderer.draw_master_overlay(&hub, &mut canvas, &mut env);
        assert!(canvas.ops.is_empty());
        assert!(!hub.banner().is_drawing());
        assert!(clock.now() > hub.banner().expires_at().unwrap());
    }

    #[test]
    fn test_missing_viewport_draws_nothing() {
        let (hub, _) = hub();
        hub.notify("hi", Duration::from_secs(1));
        hub.tasks().set_status("a", Some("working"));
        let renderer = OverlayRenderer::new(OverlayStyle::default());
        let mut canvas = RecordingCanvas::default();
        let mut clicks = RecordingClicks::default();
        let measure = FixedMeasure::new(10.0, 30.0);
        let mut env = Collaborators {
            viewport: None,
            measure: Some(&measure),
            clicks: Some(&mut clicks),
        };
        renderer.draw_master_overlay(&hub, &mut canvas, &mut env);
        assert!(canvas.ops.is_empty());
        assert!(clicks.regions.is_empty());
    }

    #[test]
    fn test_missing_click_registry_skips_buttons_only() {
        let (hub, _) = hub();
        hub.tasks().set_status("a", Some("working"));
        let renderer = OverlayRenderer::new(OverlayStyle::default());
        let mut canvas = RecordingCanvas::default();
        let measure = FixedMeasure::new(10.0, 30.0);
        let mut env = Collaborators {
            viewport: Some(viewport()),
            measure: Some(&measure),
            clicks: None,
        };
        renderer.draw_master_overlay(&hub, &mut canvas, &mut env);
        assert_eq!(canvas.buttons(), 0);
        assert!(canvas.ops.iter().any(|op| matches!(op, DrawOp::Text(t, ..) if t == "working")));
    }

    #[test]
    fn test_inactive_indicator_hides_table() {
        let (hub, _) = hub();
        // An empty status keeps the indicator off even though the task exists.
        hub.tasks().set_status("quiet", Some(""));
        let renderer = OverlayRenderer::new(OverlayStyle::default());
        let mut canvas = RecordingCanvas::default();
        let measure = FixedMeasure::new(10.0, 30.0);
        let mut env = Collaborators {
            viewport: Some(viewport()),
            measure: Some(&measure),
            clicks: None,
        };
        renderer.draw_master_overlay(&hub, &mut canvas, &mut env);
        assert!(canvas.ops.is_empty());
    }

    #[test]
    fn test_rect_contains() {
        let r = RectF::new(10.0, 10.0, 5.0, 5.0);
        assert!(r.contains(10.0, 14.9));
        assert!(!r.contains(15.0, 12.0));
    }
}
