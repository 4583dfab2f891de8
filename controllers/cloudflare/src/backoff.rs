//! # Fibonacci Backoff
//!
//! Requeue delays for resources whose reconciliation keeps failing. Delays
//! follow the Fibonacci sequence in whole minutes, capped:
//! 1m, 1m, 2m, 3m, 5m, 8m, 10m, 10m, ...
//!
//! `ResourceBackoffs` keeps one sequence per resource so a failing Account
//! does not slow down healthy ones. A successful pass resets the sequence.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Default first delay in minutes
pub const MIN_BACKOFF_MINUTES: u64 = 1;
/// Default delay cap in minutes
pub const MAX_BACKOFF_MINUTES: u64 = 10;

/// Fibonacci backoff calculator
#[derive(Debug, Clone)]
pub struct FibonacciBackoff {
    min_minutes: u64,
    prev_minutes: u64,
    current_minutes: u64,
    max_minutes: u64,
}

impl FibonacciBackoff {
    /// Sequence starting at `min_minutes` and capped at `max_minutes`
    #[must_use]
    pub fn new(min_minutes: u64, max_minutes: u64) -> Self {
        Self {
            min_minutes,
            prev_minutes: 0,
            current_minutes: min_minutes,
            max_minutes,
        }
    }

    /// Current delay; advances the sequence
    pub fn next_backoff(&mut self) -> Duration {
        let delay = Duration::from_secs(self.current_minutes * 60);

        let next_minutes = self.prev_minutes + self.current_minutes;
        self.prev_minutes = self.current_minutes;
        self.current_minutes = next_minutes.min(self.max_minutes);

        delay
    }

    /// Back to the first delay
    pub fn reset(&mut self) {
        self.prev_minutes = 0;
        self.current_minutes = self.min_minutes;
    }
}

impl Default for FibonacciBackoff {
    fn default() -> Self {
        Self::new(MIN_BACKOFF_MINUTES, MAX_BACKOFF_MINUTES)
    }
}

/// Per-resource backoff state, keyed by resource name
#[derive(Debug, Default)]
pub struct ResourceBackoffs {
    inner: Mutex<HashMap<String, FibonacciBackoff>>,
}

impl ResourceBackoffs {
    /// Next delay for `key`, starting a fresh sequence if none is tracked
    pub fn next(&self, key: &str) -> Duration {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.entry(key.to_string()).or_default().next_backoff()
    }

    /// Restart the sequence for `key` after a successful pass
    pub fn reset(&self, key: &str) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(backoff) = inner.get_mut(key) {
            backoff.reset();
        }
    }

    /// Drop the state for `key` once its resource is gone
    pub fn forget(&self, key: &str) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.remove(key);
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}
