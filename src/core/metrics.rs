//! Per-logger emission counters

use std::sync::atomic::{AtomicU64, Ordering};

/// Counts what happened to the events a logger handled
///
/// # Example
///
/// ```
/// use tree_logger::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
/// metrics.record_emitted();
/// metrics.record_suppressed();
///
/// assert_eq!(metrics.emitted(), 1);
/// assert_eq!(metrics.suppressed(), 1);
/// assert_eq!(metrics.failed(), 0);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Events written to the sink
    emitted: AtomicU64,

    /// Events dropped by a pre or post hook
    suppressed: AtomicU64,

    /// Events that failed validation, formatting, or writing
    failed: AtomicU64,
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            emitted: AtomicU64::new(0),
            suppressed: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn emitted(&self) -> u64 {
        self.emitted.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn suppressed(&self) -> u64 {
        self.suppressed.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    /// Record a written event, returning the previous count
    #[inline]
    pub fn record_emitted(&self) -> u64 {
        self.emitted.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_suppressed(&self) -> u64 {
        self.suppressed.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_failed(&self) -> u64 {
        self.failed.fetch_add(1, Ordering::Relaxed)
    }

    /// Share of handled events that failed, as a percentage
    ///
    /// Returns 0.0 if nothing has been handled.
    pub fn failure_rate(&self) -> f64 {
        let failed = self.failed() as f64;
        let total = self.emitted() as f64 + self.suppressed() as f64 + failed;
        if total == 0.0 {
            0.0
        } else {
            (failed / total) * 100.0
        }
    }

    pub fn reset(&self) {
        self.emitted.store(0, Ordering::Relaxed);
        self.suppressed.store(0, Ordering::Relaxed);
        self.failed.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current counter values
    fn clone(&self) -> Self {
        Self {
            emitted: AtomicU64::new(self.emitted()),
            suppressed: AtomicU64::new(self.suppressed()),
            failed: AtomicU64::new(self.failed()),
        }
    }
}
