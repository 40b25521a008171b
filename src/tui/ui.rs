use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Paragraph};

use crate::core::notification::Notifications;
use crate::core::overlay::{Collaborators, OverlayRenderer, TextMeasure, Viewport};
use crate::tui::canvas::BufferCanvas;
use crate::tui::component::Component;
use crate::tui::components::StatusBar;
use crate::tui::hit_regions::HitRegions;

/// Draw one frame: the map area, the status line, and the overlay on top.
///
/// `hit_regions` is rebuilt from scratch with whatever the overlay registers.
pub fn draw_ui(
    frame: &mut Frame,
    hub: &Notifications,
    renderer: &OverlayRenderer,
    measure: &dyn TextMeasure,
    hit_regions: &mut HitRegions,
) {
    use Constraint::{Length, Min};
    let [map_area, status_area] = Layout::vertical([Min(0), Length(1)]).areas(frame.area());

    draw_map_placeholder(frame, map_area);

    let tasks = hub.tasks();
    StatusBar::new(tasks.len(), tasks.work_started()).render(frame, status_area);

    hit_regions.clear();
    let mut canvas = BufferCanvas::new(frame.buffer_mut());
    let mut env = Collaborators {
        viewport: viewport_of(map_area),
        measure: Some(measure),
        clicks: Some(hit_regions),
    };
    renderer.draw_master_overlay(hub, &mut canvas, &mut env);
}

/// Overlay viewport for a terminal area. A zero-sized area has no viewport.
pub fn viewport_of(area: Rect) -> Option<Viewport> {
    if area.is_empty() {
        return None;
    }
    Some(Viewport::new(
        area.x as f32,
        area.y as f32,
        area.width as f32,
        area.height as f32,
    ))
}

fn draw_map_placeholder(frame: &mut Frame, area: Rect) {
    let style = Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM);
    let map = Paragraph::new("map view")
        .style(style)
        .alignment(Alignment::Center)
        .block(Block::bordered().border_style(style));
    frame.render_widget(map, area);
}
