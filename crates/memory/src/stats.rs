//! Engine counters.

use std::sync::atomic::{AtomicU64, Ordering};

/// Internal cache statistics with atomic counters
#[derive(Debug, Default)]
pub(crate) struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    inserts: AtomicU64,
    removals: AtomicU64,
    swept: AtomicU64,
}

impl CacheStats {
    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_insert(&self) {
        self.inserts.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_removals(&self, count: u64) {
        self.removals.fetch_add(count, Ordering::Relaxed);
    }

    pub(crate) fn record_swept(&self, count: u64) {
        self.swept.fetch_add(count, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            inserts: self.inserts.load(Ordering::Relaxed),
            removals: self.removals.load(Ordering::Relaxed),
            swept: self.swept.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time view of the engine counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    /// Selects that returned a live entry.
    pub hits: u64,
    /// Selects that found nothing live.
    pub misses: u64,
    /// Entries accepted by insert.
    pub inserts: u64,
    /// Entries dropped by clean-all.
    pub removals: u64,
    /// Entries removed by the background sweeper.
    pub swept: u64,
}

impl StatsSnapshot {
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
