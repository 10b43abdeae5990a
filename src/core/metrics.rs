//! Logger metrics for observability
//!
//! Counts how each `log` call ended so monitoring can spot a degraded
//! pipeline (rising write failures, unexpected rejections).

use std::sync::atomic::{AtomicU64, Ordering};

/// Per-outcome counters
///
/// # Example
///
/// ```
/// use typed_log_system::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
/// metrics.record_written();
/// metrics.record_write_failed();
///
/// assert_eq!(metrics.written_count(), 1);
/// assert_eq!(metrics.failure_rate(), 50.0);
/// ```
#[derive(Debug, Default)]
pub struct LoggerMetrics {
    written: AtomicU64,
    skipped: AtomicU64,
    rejected: AtomicU64,
    write_failed: AtomicU64,
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            written: AtomicU64::new(0),
            skipped: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
            write_failed: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn written_count(&self) -> u64 {
        self.written.load(Ordering::Relaxed)
    }

    /// Records below the configured level
    #[inline]
    pub fn skipped_count(&self) -> u64 {
        self.skipped.load(Ordering::Relaxed)
    }

    /// Unknown type, unknown level or missing field
    #[inline]
    pub fn rejected_count(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn write_failed_count(&self) -> u64 {
        self.write_failed.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_written(&self) -> u64 {
        self.written.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_skipped(&self) -> u64 {
        self.skipped.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_rejected(&self) -> u64 {
        self.rejected.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_write_failed(&self) -> u64 {
        self.write_failed.fetch_add(1, Ordering::Relaxed)
    }

    /// Share of attempted writes that failed, as a percentage (0.0 - 100.0)
    ///
    /// Returns 0.0 if nothing has been written yet.
    pub fn failure_rate(&self) -> f64 {
        let failed = self.write_failed_count();
        let attempted = failed + self.written_count();
        if attempted == 0 {
            return 0.0;
        }
        (failed as f64 / attempted as f64) * 100.0
    }

    pub fn reset(&self) {
        self.written.store(0, Ordering::Relaxed);
        self.skipped.store(0, Ordering::Relaxed);
        self.rejected.store(0, Ordering::Relaxed);
        self.write_failed.store(0, Ordering::Relaxed);
    }
}
