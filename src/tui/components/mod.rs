//! # TUI Components
//!
//! Props-based components: they receive everything they show as struct
//! fields and never reach into application state themselves.
//!
//! ```rust,ignore
//! // Good: dependencies are explicit
//! StatusBar::new(tasks.len(), tasks.work_started()).render(frame, area);
//! ```
//!
//! The overlay itself is not a component: it draws through the
//! backend-agnostic [`crate::core::overlay`] renderer onto a
//! [`crate::tui::canvas::BufferCanvas`].

mod status_bar;
pub use status_bar::StatusBar;
