//! Session counters for the capture phase.
//!
//! Tracks how much the source delivered and how much of it survived
//! filtering, so the operator can see at a glance whether a capture was
//! healthy. Counters are atomics: the capture loop increments them while
//! the main thread reads the final summary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for one capture session.
#[derive(Debug, Default)]
pub struct CaptureStats {
    /// Batches delivered by the source
    batches_received: AtomicU64,
    /// Valid points appended to the point set
    points_appended: AtomicU64,
    /// Points discarded for a non-finite coordinate
    points_discarded: AtomicU64,
    /// Batches dropped whole because the window had elapsed
    batches_dropped_expired: AtomicU64,
}

impl CaptureStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_batch(&self) {
        self.batches_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_appended(&self, count: u64) {
        self.points_appended.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_discarded(&self, count: u64) {
        self.points_discarded.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_expired_batch(&self) {
        self.batches_dropped_expired.fetch_add(1, Ordering::Relaxed);
    }

    /// A point-in-time copy of the counters.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            batches_received: self.batches_received.load(Ordering::Relaxed),
            points_appended: self.points_appended.load(Ordering::Relaxed),
            points_discarded: self.points_discarded.load(Ordering::Relaxed),
            batches_dropped_expired: self.batches_dropped_expired.load(Ordering::Relaxed),
            taken_at: Utc::now(),
        }
    }

    /// A summary string for end-of-session display.
    pub fn summary(&self) -> String {
        let snapshot = self.snapshot();
        format!(
            "Capture Statistics:\n\
             - Batches received: {}\n\
             - Points kept: {}\n\
             - Points discarded (non-finite): {}\n\
             - Batches dropped at window expiry: {}",
            snapshot.batches_received,
            snapshot.points_appended,
            snapshot.points_discarded,
            snapshot.batches_dropped_expired
        )
    }
}

/// Snapshot of capture statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub batches_received: u64,
    pub points_appended: u64,
    pub points_discarded: u64,
    pub batches_dropped_expired: u64,
    pub taken_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let stats = CaptureStats::new();

        stats.record_batch();
        stats.record_batch();
        stats.record_appended(10);
        stats.record_discarded(2);
        stats.record_expired_batch();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.batches_received, 2);
        assert_eq!(snapshot.points_appended, 10);
        assert_eq!(snapshot.points_discarded, 2);
        assert_eq!(snapshot.batches_dropped_expired, 1);
    }

    #[test]
    fn test_summary_format() {
        let stats = CaptureStats::new();
        stats.record_appended(5);

        let summary = stats.summary();
        assert!(summary.contains("Points kept: 5"));
        assert!(summary.contains("Batches received: 0"));
    }
}
