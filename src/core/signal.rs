//! # Signals
//!
//! A tiny observer primitive. A component owns its signals; anyone holding a
//! reference can `connect` a slot, and the component calls `emit` when
//! something happens.
//!
//! ```text
//! TaskTable ──emit(&snapshot)──▶ Signal ──▶ slot 1 (redraw flag)
//!                                       └──▶ slot 2 (status bar)
//! ```
//!
//! Slots are called with the internal lock released, so a slot may connect
//! more slots or trigger another emission without deadlocking.

use std::sync::{Arc, Mutex, PoisonError};

type Slot<T> = Arc<dyn Fn(&T) + Send + Sync>;

pub struct Signal<T> {
    slots: Mutex<Vec<Slot<T>>>,
}

impl<T> Signal<T> {
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(Vec::new()),
        }
    }

    /// Subscribe to future emissions.
    pub fn connect(&self, slot: impl Fn(&T) + Send + Sync + 'static) {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(slot));
    }

    /// Call every connected slot with `value`.
    pub fn emit(&self, value: &T) {
        let slots: Vec<Slot<T>> = self
            .slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for slot in slots {
            slot(value);
        }
    }

    pub fn slot_count(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}
