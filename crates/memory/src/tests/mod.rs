//! Engine behavior tests.

mod concurrency;
mod expiration;

use crate::{MemoryCache, MemoryCacheConfig};
use chrono::{DateTime, Utc};
use larder_core::CacheEntry;
use std::time::Duration;

/// Engine with the sweeper disabled, so tests observe lazy expiry only.
fn lazy_cache() -> MemoryCache {
    MemoryCache::new(MemoryCacheConfig::default().with_sweep_interval(Duration::ZERO))
}

fn in_millis(from_now: i64) -> DateTime<Utc> {
    Utc::now() + chrono::Duration::milliseconds(from_now)
}

fn entry_in(key: &str, from_now_ms: i64, payload: &str) -> CacheEntry {
    CacheEntry::new(key, in_millis(from_now_ms), payload)
}
