//! Scan metrics registry
//!
//! - Counters only
//! - Monotonic increase
//! - Shared across cursors through `Arc`

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Registry of scan counters.
///
/// All counters use Relaxed atomics; values are exact once the scans that
/// feed them have returned.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Cursors that issued their initial request
    scans_started: AtomicU64,
    /// Cursors that reached the empty page
    scans_completed: AtomicU64,
    /// Cursors aborted by a store error
    scans_failed: AtomicU64,
    /// Pages received, including the final empty one
    pages_fetched: AtomicU64,
    /// Hits received across all pages
    hits_fetched: AtomicU64,
    /// Rows handed to the caller
    rows_projected: AtomicU64,
    /// Scroll contexts released on close
    scrolls_cleared: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_scans_started(&self) {
        self.scans_started.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_scans_completed(&self) {
        self.scans_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_scans_failed(&self) {
        self.scans_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one received page and its hit count
    pub fn record_page(&self, hits: u64) {
        self.pages_fetched.fetch_add(1, Ordering::Relaxed);
        self.hits_fetched.fetch_add(hits, Ordering::Relaxed);
    }

    pub fn increment_rows_projected(&self) {
        self.rows_projected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_scrolls_cleared(&self) {
        self.scrolls_cleared.fetch_add(1, Ordering::Relaxed);
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            scans_started: self.scans_started.load(Ordering::Relaxed),
            scans_completed: self.scans_completed.load(Ordering::Relaxed),
            scans_failed: self.scans_failed.load(Ordering::Relaxed),
            pages_fetched: self.pages_fetched.load(Ordering::Relaxed),
            hits_fetched: self.hits_fetched.load(Ordering::Relaxed),
            rows_projected: self.rows_projected.load(Ordering::Relaxed),
            scrolls_cleared: self.scrolls_cleared.load(Ordering::Relaxed),
        }
    }

    /// Current snapshot rendered as a JSON object
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self.snapshot()).unwrap_or_default()
    }
}

/// A point-in-time snapshot of all counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub scans_started: u64,
    pub scans_completed: u64,
    pub scans_failed: u64,
    pub pages_fetched: u64,
    pub hits_fetched: u64,
    pub rows_projected: u64,
    pub scrolls_cleared: u64,
}
