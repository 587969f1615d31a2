//! Named, single-shot interval measurements over a monotonic clock.
//!
//! Labels are free-form strings. The engine namespaces them as
//! `"<test>-<phase>"` so that two measurements never share a slot.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Builds the label under which a test phase is timed.
pub fn phase_label(test: &str, phase: &str) -> String {
    format!("{}-{}", test, phase)
}

/// Tracks pending start timestamps keyed by label.
#[derive(Debug, Default)]
pub struct Timer {
    starts: HashMap<String, Instant>,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records "now" under `label`, replacing any pending start for it.
    pub fn start(&mut self, label: impl Into<String>) {
        self.starts.insert(label.into(), Instant::now());
    }

    /// Returns the time elapsed since the matching `start` and forgets it.
    ///
    /// Returns `None` when no start is pending for `label`, including a second
    /// `stop` for the same start.
    pub fn stop(&mut self, label: &str) -> Option<Duration> {
        self.starts.remove(label).map(|started| started.elapsed())
    }

    /// True while a start for `label` has not been consumed by `stop`.
    pub fn is_running(&self, label: &str) -> bool {
        self.starts.contains_key(label)
    }
}
