//! Transient single-message banner.
//!
//! There is never more than one message: a new one replaces the current one
//! outright, whether or not it had expired.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Longest time a single message may stay up.
pub const MAX_TIMEOUT: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Default)]
struct State {
    text: String,
    expires_at: Option<Instant>,
    drawing: bool,
}

#[derive(Debug, Default)]
pub struct Banner {
    state: Mutex<State>,
}

impl Banner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current message; it stays visible until `now + timeout`,
    /// with `timeout` capped at [`MAX_TIMEOUT`].
    pub fn show(&self, text: &str, timeout: Duration, now: Instant) {
        let mut state = self.lock();
        state.text = text.to_string();
        state.expires_at = now.checked_add(timeout.min(MAX_TIMEOUT)).or(Some(now));
        state.drawing = true;
    }

    pub fn is_visible(&self, now: Instant) -> bool {
        self.lock().expires_at.is_some_and(|at| now <= at)
    }

    /// The message to draw at `now`, if any. Once expired this also turns
    /// the drawing flag off.
    pub fn visible_text(&self, now: Instant) -> Option<String> {
        let mut state = self.lock();
        match state.expires_at {
            Some(at) if now <= at => Some(state.text.clone()),
            _ => {
                state.drawing = false;
                None
            }
        }
    }

    /// Whether the renderer still considers the banner live. Cleared lazily
    /// by [`Banner::visible_text`].
    pub fn is_drawing(&self) -> bool {
        self.lock().drawing
    }

    pub fn expires_at(&self) -> Option<Instant> {
        self.lock().expires_at
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
