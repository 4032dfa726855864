//! # Debounced Edits
//!
//! Rapid edits to the same field collapse into one. Each field has at most one
//! pending edit; scheduling another replaces the value and restarts the
//! window. Pending edits belong to one [`Debouncer`], so separate engines never
//! interfere with each other.
//!
//! Nothing here runs on its own. The host polls with
//! [`FilterEngine::flush_due`](crate::engine::FilterEngine::flush_due), using
//! [`Debouncer::next_deadline`] to know when to wake up.

use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::{Duration, Instant};

use serde_json::Value;

/// Source of monotonic time for debounce deadlines.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same time, so a test can keep one handle and give another
/// to the engine.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

#[derive(Debug, Clone)]
struct PendingEdit {
    value: Value,
    due: Instant,
}

/// Per-field pending edits with a shared quiet window.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    pending: BTreeMap<String, PendingEdit>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: BTreeMap::new(),
        }
    }

    /// A zero window means edits are applied directly and never scheduled.
    pub fn is_enabled(&self) -> bool {
        !self.window.is_zero()
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Schedule `value` for `field`, replacing any pending edit for it.
    ///
    /// Returns the deadline.
    pub fn schedule(&mut self, field: &str, value: Value, now: Instant) -> Instant {
        let due = now + self.window;
        let replaced = self
            .pending
            .insert(field.to_string(), PendingEdit { value, due })
            .is_some();
        if replaced {
            tracing::debug!(field, "debounced edit restarted");
        }
        due
    }

    /// Remove and return every edit whose deadline is at or before `now`.
    pub fn take_due(&mut self, now: Instant) -> Vec<(String, Value)> {
        let due: Vec<String> = self
            .pending
            .iter()
            .filter(|(_, edit)| edit.due <= now)
            .map(|(field, _)| field.clone())
            .collect();
        due.into_iter()
            .filter_map(|field| {
                let edit = self.pending.remove(&field)?;
                Some((field, edit.value))
            })
            .collect()
    }

    /// Remove and return every pending edit regardless of deadline.
    pub fn drain(&mut self) -> Vec<(String, Value)> {
        std::mem::take(&mut self.pending)
            .into_iter()
            .map(|(field, edit)| (field, edit.value))
            .collect()
    }

    pub fn cancel(&mut self, field: &str) -> bool {
        self.pending.remove(field).is_some()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().map(|edit| edit.due).min()
    }

    pub fn pending_value(&self, field: &str) -> Option<&Value> {
        self.pending.get(field).map(|edit| &edit.value)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
