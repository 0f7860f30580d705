//! Dispatch metrics for observability
//!
//! Provides counters for monitoring the health of a sink pipeline: how many
//! records were offered, how many sink writes succeeded, and how many failures the
//! dispatcher absorbed.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for dispatch observability
///
/// # Example
///
/// ```
/// use rust_logger_core::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_dispatched();
/// metrics.record_emitted();
///
/// assert_eq!(metrics.records_dispatched(), 1);
/// assert_eq!(metrics.sink_emits(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Number of records offered to the pipeline
    records_dispatched: AtomicU64,

    /// Number of successful sink writes
    sink_emits: AtomicU64,

    /// Number of times a sink declined a record
    sink_rejections: AtomicU64,

    /// Failures matched by a declared error category
    failures_handled: AtomicU64,

    /// Failures that reached the generic fallback
    failures_unhandled: AtomicU64,

    /// Panics caught while calling into a sink
    panics_caught: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            records_dispatched: AtomicU64::new(0),
            sink_emits: AtomicU64::new(0),
            sink_rejections: AtomicU64::new(0),
            failures_handled: AtomicU64::new(0),
            failures_unhandled: AtomicU64::new(0),
            panics_caught: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn records_dispatched(&self) -> u64 {
        self.records_dispatched.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sink_emits(&self) -> u64 {
        self.sink_emits.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sink_rejections(&self) -> u64 {
        self.sink_rejections.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn failures_handled(&self) -> u64 {
        self.failures_handled.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn failures_unhandled(&self) -> u64 {
        self.failures_unhandled.load(Ordering::Relaxed)
    }

    /// Every panic is also counted as a handled or unhandled failure, depending on
    /// whether its payload matched a declared category.
    #[inline]
    pub fn panics_caught(&self) -> u64 {
        self.panics_caught.load(Ordering::Relaxed)
    }

    /// Total failures absorbed by the dispatcher.
    pub fn failures(&self) -> u64 {
        self.failures_handled() + self.failures_unhandled()
    }

    #[inline]
    pub fn record_dispatched(&self) -> u64 {
        self.records_dispatched.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_emitted(&self) -> u64 {
        self.sink_emits.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_rejected(&self) -> u64 {
        self.sink_rejections.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_handled(&self) -> u64 {
        self.failures_handled.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_unhandled(&self) -> u64 {
        self.failures_unhandled.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_panic(&self) -> u64 {
        self.panics_caught.fetch_add(1, Ordering::Relaxed)
    }

    /// Get failure rate as a percentage (0.0 - 100.0) of sink calls that failed
    ///
    /// Returns 0.0 if no sink has been called yet.
    pub fn failure_rate(&self) -> f64 {
        let failed = self.failures() as f64;
        let total = self.sink_emits() as f64 + self.sink_rejections() as f64 + failed;
        if total == 0.0 {
            0.0
        } else {
            (failed / total) * 100.0
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.records_dispatched.store(0, Ordering::Relaxed);
        self.sink_emits.store(0, Ordering::Relaxed);
        self.sink_rejections.store(0, Ordering::Relaxed);
        self.failures_handled.store(0, Ordering::Relaxed);
        self.failures_unhandled.store(0, Ordering::Relaxed);
        self.panics_caught.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            records_dispatched: AtomicU64::new(self.records_dispatched()),
            sink_emits: AtomicU64::new(self.sink_emits()),
            sink_rejections: AtomicU64::new(self.sink_rejections()),
            failures_handled: AtomicU64::new(self.failures_handled()),
            failures_unhandled: AtomicU64::new(self.failures_unhandled()),
            panics_caught: AtomicU64::new(self.panics_caught()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.records_dispatched(), 0);
        assert_eq!(metrics.sink_emits(), 0);
        assert_eq!(metrics.failures(), 0);
        assert_eq!(metrics.panics_caught(), 0);
    }

    #[test]
    fn test_record_returns_previous_value() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.record_handled(), 0);
        assert_eq!(metrics.record_handled(), 1);
        metrics.record_unhandled();
        assert_eq!(metrics.failures(), 3);
    }

    #[test]
    fn test_failure_rate() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.failure_rate(), 0.0);

        for _ in 0..90 {
            metrics.record_emitted();
        }
        for _ in 0..10 {
            metrics.record_unhandled();
        }

        let rate = metrics.failure_rate();
        assert!((9.9..=10.1).contains(&rate), "Failure rate was {}", rate);
    }

    #[test]
    fn test_reset_and_snapshot() {
        let metrics = LoggerMetrics::new();
        metrics.record_dispatched();
        metrics.record_panic();

        let snapshot = metrics.clone();
        metrics.reset();

        assert_eq!(metrics.records_dispatched(), 0);
        assert_eq!(metrics.panics_caught(), 0);
        assert_eq!(snapshot.records_dispatched(), 1);
        assert_eq!(snapshot.panics_caught(), 1);
    }
}
