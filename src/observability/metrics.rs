//! Thread-safe routing metrics
//!
//! Aggregate counters are the only state shared across records in a routing
//! run. All counters are atomic; a snapshot is cheap and serializable for
//! logging or surfacing by a host.

use chrono::Utc;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global metrics collector instance
pub static METRICS: Lazy<RouterMetrics> = Lazy::new(RouterMetrics::new);

/// Get reference to global metrics collector
pub fn metrics() -> &'static RouterMetrics {
    &METRICS
}

/// Atomic counters for routing outcomes
#[derive(Debug, Default)]
pub struct RouterMetrics {
    records_processed: AtomicU64,
    direct_matches: AtomicU64,
    model_matches: AtomicU64,
    fallback_matches: AtomicU64,
    default_routed: AtomicU64,
    model_failures: AtomicU64,
    record_failures: AtomicU64,
}

/// Point-in-time view of the counters
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub records_processed: u64,
    pub direct_matches: u64,
    pub model_matches: u64,
    pub fallback_matches: u64,
    pub default_routed: u64,
    pub model_failures: u64,
    pub record_failures: u64,
    /// When this snapshot was taken (RFC3339)
    pub captured_at: String,
}

impl RouterMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_processed(&self) {
        self.records_processed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn direct_match(&self) {
        self.direct_matches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn model_match(&self) {
        self.model_matches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn fallback_match(&self) {
        self.fallback_matches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn default_routed(&self) {
        self.default_routed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn model_failure(&self) {
        self.model_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.record_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Capture the current counter values
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            records_processed: self.records_processed.load(Ordering::Relaxed),
            direct_matches: self.direct_matches.load(Ordering::Relaxed),
            model_matches: self.model_matches.load(Ordering::Relaxed),
            fallback_matches: self.fallback_matches.load(Ordering::Relaxed),
            default_routed: self.default_routed.load(Ordering::Relaxed),
            model_failures: self.model_failures.load(Ordering::Relaxed),
            record_failures: self.record_failures.load(Ordering::Relaxed),
            captured_at: Utc::now().to_rfc3339(),
        }
    }
}
