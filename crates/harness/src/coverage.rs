//! Coverage sink.
//!
//! Coverage is a side observation of observed transactions. Sinks are infallible
//! and must not block; nothing they do affects the verdict.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::common::constants::COVERAGE_BUCKETS;
use crate::transaction::Transaction;

/// Receives every transaction the monitor observes.
pub trait CoverageSink: Send + Sync {
    /// Records one observed transaction.
    fn record(&self, txn: &Transaction);
}

/// Lock-free counters bucketed on the top nibble of the response data.
#[derive(Debug, Default)]
pub struct CoverageCounters {
    total: AtomicU64,
    buckets: [AtomicU64; COVERAGE_BUCKETS],
}

/// Point-in-time copy of `CoverageCounters`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverageSnapshot {
    /// Transactions recorded.
    pub total: u64,
    /// Hits per top-nibble bucket.
    pub buckets: [u64; COVERAGE_BUCKETS],
}

impl CoverageSnapshot {
    /// Number of buckets hit at least once.
    pub fn buckets_hit(&self) -> usize {
        self.buckets.iter().filter(|&&n| n > 0).count()
    }
}

impl CoverageCounters {
    /// Creates zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies the current counts.
    pub fn snapshot(&self) -> CoverageSnapshot {
        CoverageSnapshot {
            total: self.total.load(Ordering::Relaxed),
            buckets: std::array::from_fn(|i| self.buckets[i].load(Ordering::Relaxed)),
        }
    }
}

impl CoverageSink for CoverageCounters {
    fn record(&self, txn: &Transaction) {
        let _ = self.total.fetch_add(1, Ordering::Relaxed);
        if let Some(data) = txn.response_data() {
            let bucket = (data >> 28) as usize;
            let _ = self.buckets[bucket].fetch_add(1, Ordering::Relaxed);
        }
    }
}
