//! Metrics registry for widecol
//!
//! - Counters only
//! - Monotonic increase
//! - Thread-safe, relaxed ordering

use std::sync::atomic::{AtomicU64, Ordering};

/// Client-side operational counters
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Check-and-mutate calls that applied their batch
    cas_applied: AtomicU64,
    /// Check-and-mutate calls whose predicates failed
    cas_rejected: AtomicU64,
    /// Bounded scans issued
    pages_scanned: AtomicU64,
    /// Rows returned by scans
    rows_scanned: AtomicU64,
    /// Operations submitted through batches
    batch_operations: AtomicU64,
    /// Batch positions that returned an error
    batch_failures: AtomicU64,
    /// Calls that failed in the backend
    backend_errors: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new metrics registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_cas_applied(&self) {
        self.cas_applied.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_cas_rejected(&self) {
        self.cas_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one scanned page and its row count
    pub fn record_page(&self, rows: u64) {
        self.pages_scanned.fetch_add(1, Ordering::Relaxed);
        self.rows_scanned.fetch_add(rows, Ordering::Relaxed);
    }

    /// Record a finished batch
    pub fn record_batch(&self, operations: u64, failures: u64) {
        self.batch_operations.fetch_add(operations, Ordering::Relaxed);
        self.batch_failures.fetch_add(failures, Ordering::Relaxed);
    }

    pub fn increment_backend_errors(&self) {
        self.backend_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current values as JSON
    pub fn to_json(&self) -> String {
        let s = self.snapshot();
        format!(
            r#"{{"cas_applied":{},"cas_rejected":{},"pages_scanned":{},"rows_scanned":{},"batch_operations":{},"batch_failures":{},"backend_errors":{}}}"#,
            s.cas_applied,
            s.cas_rejected,
            s.pages_scanned,
            s.rows_scanned,
            s.batch_operations,
            s.batch_failures,
            s.backend_errors,
        )
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            cas_applied: self.cas_applied.load(Ordering::Relaxed),
            cas_rejected: self.cas_rejected.load(Ordering::Relaxed),
            pages_scanned: self.pages_scanned.load(Ordering::Relaxed),
            rows_scanned: self.rows_scanned.load(Ordering::Relaxed),
            batch_operations: self.batch_operations.load(Ordering::Relaxed),
            batch_failures: self.batch_failures.load(Ordering::Relaxed),
            backend_errors: self.backend_errors.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    pub cas_applied: u64,
    pub cas_rejected: u64,
    pub pages_scanned: u64,
    pub rows_scanned: u64,
    pub batch_operations: u64,
    pub batch_failures: u64,
    pub backend_errors: u64,
}
