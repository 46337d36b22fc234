//! Write path counters
//!
//! - Counters only, monotonic
//! - Reset only when the client is created
//! - Relaxed atomics; readers may see counters from different instants

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::status::ItemResult;

/// Counters shared by the dispatcher, decoding tasks and trace emitter
#[derive(Debug, Default)]
pub struct WriteMetrics {
    /// Transport calls completed
    batches_dispatched: AtomicU64,
    /// Updates that succeeded
    items_ok: AtomicU64,
    /// Updates that failed, including synthesized results
    items_failed: AtomicU64,
    /// Results synthesized for undecodable details
    items_synthesized: AtomicU64,
    /// Traces accepted by the trace sink
    traces_delivered: AtomicU64,
    /// Traces discarded
    traces_dropped: AtomicU64,
    /// Result sets nobody was waiting for
    results_unclaimed: AtomicU64,
    /// Queued writes released at teardown without being sent
    writes_abandoned: AtomicU64,
}

impl WriteMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_batches_dispatched(&self) {
        self.batches_dispatched.fetch_add(1, Ordering::Relaxed);
    }

    /// Count the outcome of every update in a decoded batch
    pub fn record_results(&self, results: &[ItemResult]) {
        let mut ok = 0;
        let mut synthesized = 0;
        for result in results {
            if result.is_ok() {
                ok += 1;
            }
            if result.is_synthesized() {
                synthesized += 1;
            }
        }
        let failed = results.len() as u64 - ok;
        self.items_ok.fetch_add(ok, Ordering::Relaxed);
        self.items_failed.fetch_add(failed, Ordering::Relaxed);
        self.items_synthesized.fetch_add(synthesized, Ordering::Relaxed);
    }

    pub fn increment_traces_delivered(&self) {
        self.traces_delivered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_traces_dropped(&self) {
        self.traces_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_results_unclaimed(&self) {
        self.results_unclaimed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_writes_abandoned(&self, count: u64) {
        self.writes_abandoned.fetch_add(count, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            batches_dispatched: self.batches_dispatched.load(Ordering::Relaxed),
            items_ok: self.items_ok.load(Ordering::Relaxed),
            items_failed: self.items_failed.load(Ordering::Relaxed),
            items_synthesized: self.items_synthesized.load(Ordering::Relaxed),
            traces_delivered: self.traces_delivered.load(Ordering::Relaxed),
            traces_dropped: self.traces_dropped.load(Ordering::Relaxed),
            results_unclaimed: self.results_unclaimed.load(Ordering::Relaxed),
            writes_abandoned: self.writes_abandoned.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time copy of [`WriteMetrics`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub batches_dispatched: u64,
    pub items_ok: u64,
    pub items_failed: u64,
    pub items_synthesized: u64,
    pub traces_delivered: u64,
    pub traces_dropped: u64,
    pub results_unclaimed: u64,
    pub writes_abandoned: u64,
}

impl MetricsSnapshot {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::{Code, Detail, DEVICE_ERROR_TYPE_URL};

    #[test]
    fn test_new_metrics_are_zero() {
        assert_eq!(WriteMetrics::new().snapshot(), MetricsSnapshot::default());
    }

    #[test]
    fn test_record_results() {
        let metrics = WriteMetrics::new();
        let bad = Detail::new(DEVICE_ERROR_TYPE_URL, b"?".to_vec())
            .unpack()
            .unwrap_err();
        metrics.record_results(&[
            ItemResult::ok(),
            ItemResult::from_status(Code::Aborted, "aborted"),
            ItemResult::synthesized(&bad),
        ]);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.items_ok, 1);
        assert_eq!(snapshot.items_failed, 2);
        assert_eq!(snapshot.items_synthesized, 1);
    }

    #[test]
    fn test_snapshot_json() {
        let metrics = WriteMetrics::new();
        metrics.increment_batches_dispatched();
        metrics.increment_traces_dropped();
        metrics.increment_traces_dropped();

        let parsed: serde_json::Value =
            serde_json::from_str(&metrics.snapshot().to_json()).unwrap();
        assert_eq!(parsed["batches_dispatched"], 1);
        assert_eq!(parsed["traces_dropped"], 2);
        assert_eq!(parsed["writes_abandoned"], 0);
    }
}
