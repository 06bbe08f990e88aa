//! Expiry and sweeping tests

use super::{entry_in, lazy_cache};
use crate::{MemoryCache, MemoryCacheConfig};
use larder_core::{Cache, CacheEntryKey, CacheResult};
use std::time::Duration;

#[tokio::test]
async fn expired_entry_reads_absent_before_any_sweep() -> CacheResult<()> {
    let cache = lazy_cache();
    cache.insert(entry_in("short", 80, "v")).await?;
    assert!(cache.select(&CacheEntryKey::new("short")).await?.is_some());

    tokio::time::sleep(Duration::from_millis(150)).await;

    assert!(cache.select(&CacheEntryKey::new("short")).await?.is_none());
    // Lazy expiry: the value is invisible but still stored.
    assert_eq!(cache.len(), 1);
    Ok(())
}

#[tokio::test]
async fn reinsert_after_expiry_replaces_the_entry() -> CacheResult<()> {
    let cache = lazy_cache();
    cache.insert(entry_in("k1", 50, "old")).await?;
    tokio::time::sleep(Duration::from_millis(120)).await;

    cache.insert(entry_in("k1", 60_000, "new")).await?;

    let found = cache.select(&CacheEntryKey::new("k1")).await?;
    assert_eq!(found.unwrap().payload, "new");
    // The key moved buckets instead of appearing in two.
    assert_eq!(cache.bucket_count(), 1);
    assert_eq!(cache.len(), 1);
    Ok(())
}

#[tokio::test]
async fn sweeper_removes_expired_buckets_and_their_entries() -> CacheResult<()> {
    let cache = MemoryCache::new(
        MemoryCacheConfig::default().with_sweep_interval(Duration::from_millis(25)),
    );
    cache.insert(entry_in("short", 100, "v")).await?;
    cache.insert(entry_in("long", 60_000, "v")).await?;

    tokio::time::sleep(Duration::from_millis(400)).await;

    assert_eq!(cache.len(), 1);
    assert_eq!(cache.bucket_count(), 1);
    let all = cache.select_all().await?;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].key.as_str(), "long");
    assert_eq!(cache.stats().swept, 1);
    Ok(())
}

#[tokio::test]
async fn entry_expiring_in_two_seconds_disappears() -> CacheResult<()> {
    let cache = MemoryCache::new(MemoryCacheConfig::default());
    cache.insert(entry_in("user-1", 2_000, "profile")).await?;

    assert!(cache.select(&CacheEntryKey::new("user-1")).await?.is_some());

    tokio::time::sleep(Duration::from_secs(3)).await;

    assert!(cache.select(&CacheEntryKey::new("user-1")).await?.is_none());
    assert!(cache.select_all().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn manual_sweep_removes_only_approved_buckets() -> CacheResult<()> {
    let cache = lazy_cache();
    cache.insert(entry_in("dead", -100, "v")).await?;
    cache.insert(entry_in("live", 60_000, "v")).await?;

    crate::sweep::sweep_cycle(&cache.inner);

    assert_eq!(cache.len(), 1);
    assert_eq!(cache.bucket_count(), 1);
    assert!(cache.select(&CacheEntryKey::new("live")).await?.is_some());
    Ok(())
}
