//! # Core Application Logic
//!
//! Background task tracking, transient notifications and the heads-up
//! overlay. It knows nothing about any specific UI technology.
//!
//! ```text
//!   ThreadManager ──events──▶ TaskTable ──signals──▶ redraw request
//!                                 ▲                        │
//!                                 │                        ▼
//!   Message ──▶ Notifications ────┘            OverlayRenderer::draw
//!      ▲        (banner, routing)                          │
//!      │                                                   ▼
//!      └─────────────── click on a cancel button ◀── Canvas / ClickRegistry
//! ```
//!
//! ## Modules
//!
//! - [`signal`]: observer primitive owned by each stateful component
//! - [`clock`]: injectable time source
//! - [`tasks`]: the task table and work-in-progress indicator
//! - [`banner`]: the single transient message
//! - [`message`]: the string message channel and directive dispatch
//! - [`notification`]: the hub tying tasks, banner and messages together
//! - [`overlay`]: backend-agnostic drawing of banner and task table
//! - [`config`]: settings with defaults → file → env → CLI resolution

pub mod banner;
pub mod clock;
pub mod config;
pub mod message;
pub mod notification;
pub mod overlay;
pub mod signal;
pub mod tasks;
