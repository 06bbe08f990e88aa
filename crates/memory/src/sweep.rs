//! Background expiration sweeping.

use crate::cache::{Inner, MemoryCache};
use chrono::{DateTime, Utc};
use larder_core::CacheEntryKey;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tracing::debug;

/// Start the background sweeper task
pub(crate) fn start(cache: &MemoryCache, sweep_interval: Duration) {
    // Don't start the sweeper if the interval is zero (useful for tests)
    if sweep_interval == Duration::ZERO {
        return;
    }

    // The task only holds a weak reference, so dropping the last cache
    // handle ends the loop instead of keeping the engine alive forever.
    let weak: Weak<Inner> = Arc::downgrade(&cache.inner);
    let handle = tokio::spawn(async move {
        let mut interval = tokio::time::interval(sweep_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            match weak.upgrade() {
                Some(inner) => sweep_cycle(&inner),
                None => break,
            }
        }
    });

    *cache.inner.sweeper.write() = Some(handle);
}

/// One pass over the index: every bucket the decider approves is removed
/// together with its entries.
pub(crate) fn sweep_cycle(inner: &Inner) {
    let buckets: Vec<(DateTime<Utc>, Vec<CacheEntryKey>)> = inner
        .expirations
        .iter()
        .map(|bucket| (*bucket.key(), bucket.value().clone()))
        .collect();

    for (expires_at, keys) in buckets {
        if !inner.decider.should_remove(&keys, expires_at) {
            continue;
        }
        let removed = remove_bucket(inner, expires_at);
        if removed > 0 {
            debug!(bucket = %expires_at, entries = removed, "expired bucket removed");
        }
    }
}

/// Deletes the bucket's keys from the store, then the bucket itself, under
/// the index lock so a concurrent insert cannot append into a dying bucket.
fn remove_bucket(inner: &Inner, expires_at: DateTime<Utc>) -> u64 {
    let _guard = inner.index_lock.lock();
    let keys = match inner.expirations.get(&expires_at) {
        Some(bucket) => bucket.value().clone(),
        None => return 0,
    };

    let mut removed = 0;
    for key in &keys {
        if inner.entries.remove(key).is_some() {
            removed += 1;
        }
    }
    inner.expirations.remove(&expires_at);
    inner.stats.record_swept(removed);
    removed
}
