//! # Notification Hub
//!
//! The module the rest of the application talks to: it owns the task table
//! and the banner, answers messages addressed to `notification`, and
//! announces every notification on [`Notifications::notification_triggered`]
//! so a platform banner can pick it up.

use log::{debug, error, info};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::core::banner::Banner;
use crate::core::clock::Clock;
use crate::core::message::{Directive, Message, NOTIFICATION_MODULE};
use crate::core::signal::Signal;
use crate::core::tasks::TaskTable;

pub struct Notifications {
    tasks: Arc<TaskTable>,
    banner: Banner,
    clock: Arc<dyn Clock>,
    default_timeout: Duration,
    /// When set, the platform shows notifications and the custom banner
    /// stays hidden.
    platform_banner: bool,
    pub notification_triggered: Signal<(String, Duration)>,
}

impl Notifications {
    pub fn new(
        tasks: Arc<TaskTable>,
        clock: Arc<dyn Clock>,
        default_timeout: Duration,
        platform_banner: bool,
    ) -> Self {
        Self {
            tasks,
            banner: Banner::new(),
            clock,
            default_timeout,
            platform_banner,
            notification_triggered: Signal::new(),
        }
    }

    pub fn tasks(&self) -> &Arc<TaskTable> {
        &self.tasks
    }

    pub fn banner(&self) -> &Banner {
        &self.banner
    }

    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    pub fn notify(&self, text: &str, timeout: Duration) {
        debug!("Notification ({} ms): {text}", timeout.as_millis());
        self.notification_triggered.emit(&(text.to_string(), timeout));
        if !self.platform_banner {
            self.banner.show(text, timeout, self.clock.now());
        }
    }

    /// Route a message. Returns `false` if it was meant for another module.
    pub fn handle_message(&self, message: &Message) -> bool {
        if !message.is_for(NOTIFICATION_MODULE) {
            debug!("Ignoring message for module {}", message.module);
            return false;
        }
        match Directive::classify(message) {
            Some(Directive::Notify { text, timeout }) => {
                self.notify(&text, timeout.unwrap_or(self.default_timeout));
            }
            Some(Directive::WipOverlay(enabled)) => {
                info!("Work-in-progress overlay toggled by message: {enabled}");
                self.tasks.set_wip_overlay(enabled);
            }
            Some(Directive::CancelTask(name)) => self.tasks.cancel(&name),
            None => {}
        }
        true
    }

    /// Parse and route a raw message line; bad lines are logged and dropped.
    pub fn handle_raw(&self, raw: &str) -> bool {
        match Message::parse(raw) {
            Ok(message) => self.handle_message(&message),
            Err(e) => {
                error!("{e}");
                false
            }
        }
    }
}
