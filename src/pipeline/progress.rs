//! Thread-safe batch progress accounting.
//!
//! The aggregator is the single point of shared mutable state among
//! concurrently running units. Everything goes through atomics, so any
//! number of workers can record completions simultaneously without a
//! lost update and any number of readers can snapshot at any time.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::error::{PixelmillError, Result};

/// Immutable (completed, total) pair read by observers at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub completed: usize,
    pub total: usize,
}

impl ProgressSnapshot {
    /// Fractional progress in `[0.0, 1.0]`. An empty batch counts as done.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }

    pub fn is_complete(&self) -> bool {
        self.completed == self.total
    }
}

/// Converts concurrent "one unit finished" signals into a consistent
/// monotonically non-decreasing progress value.
#[derive(Debug, Default)]
pub struct ProgressAggregator {
    initialized: AtomicBool,
    total: AtomicUsize,
    completed: AtomicUsize,
}

impl ProgressAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixes the total and resets the completed count. Must run before
    /// any completion is recorded.
    pub fn initialize(&self, total: usize) {
        self.total.store(total, Ordering::SeqCst);
        self.completed.store(0, Ordering::SeqCst);
        self.initialized.store(true, Ordering::SeqCst);
    }

    /// Atomically counts one finished unit and returns the new snapshot.
    ///
    /// Safe to call from any number of workers at once; no increment is
    /// lost and `completed` never exceeds `total` (extra calls saturate).
    pub fn record_completion(&self) -> Result<ProgressSnapshot> {
        if !self.initialized.load(Ordering::SeqCst) {
            return Err(PixelmillError::NotInitialized);
        }
        let total = self.total.load(Ordering::SeqCst);
        let completed = match self.completed.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |count| {
            (count < total).then_some(count + 1)
        }) {
            Ok(previous) => previous + 1,
            Err(_) => total,
        };
        Ok(ProgressSnapshot { completed, total })
    }

    /// Current (completed, total) without mutating state.
    pub fn snapshot(&self) -> Result<ProgressSnapshot> {
        if !self.initialized.load(Ordering::SeqCst) {
            return Err(PixelmillError::NotInitialized);
        }
        Ok(ProgressSnapshot {
            completed: self.completed.load(Ordering::SeqCst),
            total: self.total.load(Ordering::SeqCst),
        })
    }
}
