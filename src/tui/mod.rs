//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, draws the map area and
//! status line, and hands the overlay a [`canvas::BufferCanvas`] to draw on.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! The loop only draws when something asked for it:
//!
//! - **Task table changes**: `tasks_changed` and `wip_enabled` set a shared
//!   needs-redraw flag from whichever worker thread fired them.
//! - **Banner showing**: redraws every ~100ms so it disappears on time.
//! - **Input**: any key, click or resize.
//!
//! Otherwise it sleeps up to 250ms between polls.

mod component;
mod components;
mod event;

pub mod canvas;
pub mod hit_regions;
pub mod ui;

use log::{debug, info};
use std::io::stdout;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;

use crate::core::clock::SystemClock;
use crate::core::config::ResolvedConfig;
use crate::core::notification::Notifications;
use crate::core::overlay::OverlayRenderer;
use crate::core::tasks::{TaskTable, ThreadManager};
use crate::threads::WorkerPool;
use crate::tui::canvas::TermTextMeasure;
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};
use crate::tui::hit_regions::HitRegions;

const BANNER_FRAME: Duration = Duration::from_millis(100);
const IDLE_POLL: Duration = Duration::from_millis(250);

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(stdout(), EnableMouseCapture)?;
        info!("Terminal modes enabled (mouse)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture);
    }
}

/// Wire a worker pool, task table and notification hub together.
pub fn build_hub(config: &ResolvedConfig) -> (Arc<WorkerPool>, Notifications) {
    let pool = Arc::new(WorkerPool::new());
    let threads: Arc<dyn ThreadManager> = pool.clone();
    let tasks = Arc::new(TaskTable::new(Some(threads)));
    tasks.attach(&pool.events);
    let hub = Notifications::new(
        tasks,
        Arc::new(SystemClock),
        config.default_timeout,
        config.platform_banner,
    );
    if config.platform_banner {
        hub.notification_triggered.connect(|(text, timeout)| {
            info!("Platform notification ({} ms): {text}", timeout.as_millis());
        });
    }
    (pool, hub)
}

/// Must be called from within a tokio runtime; jobs run as tokio tasks.
pub fn run(config: &ResolvedConfig) -> std::io::Result<()> {
    let (pool, hub) = build_hub(config);
    let renderer = OverlayRenderer::new(config.overlay.clone());
    let measure = TermTextMeasure;
    let mut hit_regions = HitRegions::new();

    let needs_redraw = Arc::new(AtomicBool::new(true));
    {
        let flag = needs_redraw.clone();
        hub.tasks()
            .tasks_changed
            .connect(move |_| flag.store(true, Ordering::Relaxed));
        let flag = needs_redraw.clone();
        hub.tasks()
            .wip_enabled
            .connect(move |_| flag.store(true, Ordering::Relaxed));
    }

    let mut terminal = ratatui::init();
    let mode_guard = match TerminalModeGuard::new() {
        Ok(guard) => guard,
        Err(e) => {
            ratatui::restore();
            return Err(e);
        }
    };

    let result = loop {
        let banner_live = hub.banner().is_drawing();
        if needs_redraw.swap(false, Ordering::Relaxed) || banner_live {
            let drawn =
                terminal.draw(|f| ui::draw_ui(f, &hub, &renderer, &measure, &mut hit_regions));
            if let Err(e) = drawn {
                break Err(e);
            }
        }

        let timeout = if banner_live { BANNER_FRAME } else { IDLE_POLL };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw.store(true, Ordering::Relaxed);
        }

        let mut should_quit = false;
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            match event {
                TuiEvent::Quit => should_quit = true,
                TuiEvent::Resize => {}
                TuiEvent::MouseClick(col, row) => {
                    if let Some(message) = hit_regions.hit_test(col, row).cloned() {
                        debug!("Click at ({col}, {row}) → {message}");
                        hub.handle_message(&message);
                    }
                }
                TuiEvent::SpawnTileFetch => {
                    pool.spawn_job("tiles", config.job_steps, config.step_interval);
                }
                TuiEvent::SpawnSearch => {
                    pool.spawn_job("search", config.job_steps, config.step_interval);
                }
                TuiEvent::ShowBanner => {
                    hub.handle_raw("notification:Map tiles refreshed#3");
                }
                TuiEvent::ToggleOverlay => {
                    let toggle = if hub.tasks().is_wip_active() { "disable" } else { "enable" };
                    hub.handle_raw(&format!("ml:notification:workInProgressOverlay:{toggle}"));
                }
            }
        }

        if should_quit {
            break Ok(());
        }
    };

    drop(mode_guard);
    ratatui::restore();
    info!("navhud shutting down ({} jobs still running)", pool.running());
    result
}
