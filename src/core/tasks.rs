//! # Task Table
//!
//! Tracks background work by name. Each entry is just the last known status
//! text and progress fraction; there is no lifecycle history.
//!
//! ```text
//! ThreadManager events ──▶ TaskTable ──tasks_changed──▶ redraw
//!  (status / progress /        │
//!   removed)                   └──wip_enabled────────▶ redraw
//!
//! cancel button ──▶ Message ──▶ TaskTable::cancel ──▶ ThreadManager::cancel
//! ```
//!
//! ## Work-in-progress indicator
//!
//! The indicator is a flag, not a function of table size:
//!
//! - **Idle → Active** when a status or progress update carries a value and
//!   the flag is not already set.
//! - **Active → Idle** when the table is empty after a removal.
//!
//! So a task that only ever reports an empty status does not switch the
//! indicator on, even though it sits in the table.
//!
//! ## Locking
//!
//! One mutex guards the map and the flag. It is taken for the mutation only
//! and released before any signal is emitted, so a slot can call straight
//! back into the table.

use chrono::{DateTime, Local};
use log::{debug, error, info, warn};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::core::signal::Signal;

/// Last known state of one named unit of background work.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Task {
    pub status: Option<String>,
    /// Completion fraction in `0.0..=1.0`; `None` means indeterminate.
    pub progress: Option<f32>,
}

impl Task {
    /// Text shown next to the cancel button.
    pub fn label(&self) -> String {
        let status = self.status.as_deref().unwrap_or("");
        match self.progress {
            Some(p) if status.is_empty() => format!("{:.0}%", p * 100.0),
            Some(p) => format!("{status} ({:.0}%)", p * 100.0),
            None => status.to_string(),
        }
    }
}

pub type TaskSnapshot = Vec<(String, Task)>;

/// Events a thread manager reports about the threads it runs.
#[derive(Debug, Clone, PartialEq)]
pub enum ThreadEvent {
    StatusChanged(String, Option<String>),
    ProgressChanged(String, Option<f32>),
    Removed(String),
}

/// The process-wide owner of background threads.
pub trait ThreadManager: Send + Sync {
    /// Ask the named thread to stop. Returns `false` if nothing by that name
    /// is running; callers treat this as best effort.
    fn cancel(&self, name: &str) -> bool;
}

#[derive(Default)]
struct Inner {
    tasks: BTreeMap<String, Task>,
    wip_active: bool,
    work_started: Option<DateTime<Local>>,
}

pub struct TaskTable {
    inner: Mutex<Inner>,
    threads: Option<Arc<dyn ThreadManager>>,
    /// Fired after every successful mutation with the full table.
    pub tasks_changed: Signal<TaskSnapshot>,
    /// Fired when the work-in-progress indicator is switched on or off.
    pub wip_enabled: Signal<bool>,
}

impl TaskTable {
    pub fn new(threads: Option<Arc<dyn ThreadManager>>) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            threads,
            tasks_changed: Signal::new(),
            wip_enabled: Signal::new(),
        }
    }

    /// Subscribe to a thread manager's event source.
    ///
    /// The subscription holds a weak reference, so the thread manager does
    /// not keep the table alive.
    pub fn attach(self: &Arc<Self>, events: &Signal<ThreadEvent>) {
        let table: Weak<TaskTable> = Arc::downgrade(self);
        events.connect(move |event| {
            if let Some(table) = table.upgrade() {
                table.handle_thread_event(event.clone());
            }
        });
    }

    pub fn handle_thread_event(&self, event: ThreadEvent) {
        match event {
            ThreadEvent::StatusChanged(name, status) => self.set_status(&name, status.as_deref()),
            ThreadEvent::ProgressChanged(name, progress) => self.set_progress(&name, progress),
            ThreadEvent::Removed(name) => {
                self.remove(&name);
            }
        }
    }

    pub fn set_status(&self, name: &str, status: Option<&str>) {
        let snapshot = {
            let mut inner = self.lock();
            let task = inner.tasks.entry(name.to_string()).or_default();
            task.status = status.map(str::to_string);
            snapshot_of(&inner)
        };
        debug!("Task {name} status: {status:?}");
        self.tasks_changed.emit(&snapshot);
        if status.is_some_and(|s| !s.is_empty()) {
            self.start_wip();
        }
    }

    pub fn set_progress(&self, name: &str, progress: Option<f32>) {
        let progress = match progress {
            Some(p) if !p.is_finite() => {
                warn!("Task {name} reported non-finite progress {p}, treating as indeterminate");
                None
            }
            Some(p) => Some(p.clamp(0.0, 1.0)),
            None => None,
        };
        let snapshot = {
            let mut inner = self.lock();
            let task = inner.tasks.entry(name.to_string()).or_default();
            task.progress = progress;
            snapshot_of(&inner)
        };
        self.tasks_changed.emit(&snapshot);
        if progress.is_some() {
            self.start_wip();
        }
    }

    /// Stop tracking `name`. Returns `false` (and logs) if it was unknown.
    pub fn remove(&self, name: &str) -> bool {
        let (removed, snapshot, now_empty) = {
            let mut inner = self.lock();
            let removed = inner.tasks.remove(name).is_some();
            (removed, snapshot_of(&inner), inner.tasks.is_empty())
        };
        if removed {
            self.tasks_changed.emit(&snapshot);
        } else {
            error!("Can't remove unknown task: {name}");
        }
        if now_empty {
            self.stop_wip();
        }
        removed
    }

    /// Cancel the thread behind `name` and stop tracking it.
    ///
    /// The entry is dropped immediately; nothing waits for the thread.
    pub fn cancel(&self, name: &str) {
        match &self.threads {
            Some(threads) => {
                if !threads.cancel(name) {
                    debug!("Thread manager had nothing running for {name}");
                }
            }
            None => warn!("No thread manager attached, only untracking {name}"),
        }
        self.remove(name);
        info!("Task {name} has been cancelled");
    }

    /// Switch the indicator directly, bypassing task updates.
    pub fn set_wip_overlay(&self, enabled: bool) {
        if enabled {
            self.start_wip();
        } else {
            self.stop_wip();
        }
    }

    pub fn snapshot(&self) -> TaskSnapshot {
        snapshot_of(&self.lock())
    }

    pub fn get(&self, name: &str) -> Option<Task> {
        self.lock().tasks.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().tasks.is_empty()
    }

    pub fn is_wip_active(&self) -> bool {
        self.lock().wip_active
    }

    /// When the current stretch of background work began, if any.
    pub fn work_started(&self) -> Option<DateTime<Local>> {
        self.lock().work_started
    }

    fn start_wip(&self) {
        {
            let mut inner = self.lock();
            if inner.wip_active {
                return;
            }
            inner.wip_active = true;
            inner.work_started = Some(Local::now());
        }
        debug!("Work-in-progress overlay enabled");
        self.wip_enabled.emit(&true);
    }

    fn stop_wip(&self) {
        {
            let mut inner = self.lock();
            inner.wip_active = false;
            inner.work_started = None;
        }
        debug!("Work-in-progress overlay disabled");
        self.wip_enabled.emit(&false);
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn snapshot_of(inner: &Inner) -> TaskSnapshot {
    inner
        .tasks
        .iter()
        .map(|(name, task)| (name.clone(), task.clone()))
        .collect()
}
