//! Basic file tier operation tests

use super::{entry_in, file_count, lazy_cache, scratch_base};
use larder_core::{Cache, CacheEntry, CacheEntryKey, CacheError, CacheResult};
use std::time::Duration;
use uuid::Uuid;

#[tokio::test]
async fn insert_then_select_round_trips_through_disk() -> CacheResult<()> {
    let base = scratch_base();
    // Mirroring is off by default, so this select must hit the disk path.
    let cache = lazy_cache(base.path()).await;

    let entry = entry_in("k1", 60_000, "payload-1");
    cache.insert(entry.clone()).await?;

    let found = cache.select(&CacheEntryKey::new("k1")).await?;
    assert_eq!(found, Some(entry));
    Ok(())
}

#[tokio::test]
async fn select_of_a_missing_key_is_none() -> CacheResult<()> {
    let base = scratch_base();
    let cache = lazy_cache(base.path()).await;
    assert_eq!(cache.select(&CacheEntryKey::new("nope")).await?, None);
    Ok(())
}

#[tokio::test]
async fn duplicate_insert_is_rejected_while_live() -> CacheResult<()> {
    let base = scratch_base();
    let cache = lazy_cache(base.path()).await;
    cache.insert(entry_in("k1", 60_000, "first")).await?;

    let result = cache.insert(entry_in("k1", 60_000, "second")).await;
    match result {
        Err(CacheError::AlreadyPersisted { key }) => assert_eq!(key.as_str(), "k1"),
        other => panic!("expected AlreadyPersisted, got {other:?}"),
    }

    let found = cache.select(&CacheEntryKey::new("k1")).await?;
    assert_eq!(found.unwrap().payload, "first");
    Ok(())
}

#[tokio::test]
async fn expired_entry_reads_absent_before_any_sweep() -> CacheResult<()> {
    let base = scratch_base();
    let cache = lazy_cache(base.path()).await;
    cache.insert(entry_in("short", 80, "v")).await?;
    assert!(cache.select(&CacheEntryKey::new("short")).await?.is_some());

    tokio::time::sleep(Duration::from_millis(150)).await;

    assert!(cache.select(&CacheEntryKey::new("short")).await?.is_none());
    // Lazy expiry: the file is still on disk until a sweep.
    assert_eq!(file_count(&base.path().join("cache")), 1);
    Ok(())
}

#[tokio::test]
async fn reinsert_after_expiry_replaces_the_file() -> CacheResult<()> {
    let base = scratch_base();
    let cache = lazy_cache(base.path()).await;
    cache.insert(entry_in("k1", 50, "old")).await?;
    tokio::time::sleep(Duration::from_millis(120)).await;

    cache.insert(entry_in("k1", 60_000, "new")).await?;

    let found = cache.select(&CacheEntryKey::new("k1")).await?;
    assert_eq!(found.unwrap().payload, "new");
    assert_eq!(file_count(&base.path().join("cache")), 1);
    Ok(())
}

#[tokio::test]
async fn insert_many_stores_fifty_entries() -> CacheResult<()> {
    let base = scratch_base();
    let cache = lazy_cache(base.path()).await;
    let entries: Vec<CacheEntry> = (0..50)
        .map(|i| entry_in(&Uuid::new_v4().to_string(), 60_000, &format!("payload-{i}")))
        .collect();

    cache.insert_many(entries).await?;
    assert_eq!(cache.select_all().await?.len(), 50);
    Ok(())
}

#[tokio::test]
async fn insert_many_reports_failures_without_rolling_back() -> CacheResult<()> {
    let base = scratch_base();
    let cache = lazy_cache(base.path()).await;
    cache.insert(entry_in("dup", 60_000, "original")).await?;

    let batch = vec![
        entry_in("dup", 60_000, "clash"),
        entry_in("fresh", 60_000, "kept"),
    ];
    let result = cache.insert_many(batch).await;
    assert!(matches!(result, Err(CacheError::AlreadyPersisted { .. })));

    let kept = cache.select(&CacheEntryKey::new("fresh")).await?;
    assert_eq!(kept.unwrap().payload, "kept");
    Ok(())
}

#[tokio::test]
async fn spawned_operations_are_joinable() -> CacheResult<()> {
    let base = scratch_base();
    let cache = lazy_cache(base.path()).await;

    cache.spawn_insert(entry_in("bg", 60_000, "spawned")).await.unwrap()?;

    let one = cache.spawn_select(CacheEntryKey::new("bg")).await.unwrap()?;
    assert_eq!(one.unwrap().payload, "spawned");

    let all = cache.spawn_select_all().await.unwrap()?;
    assert_eq!(all.len(), 1);
    Ok(())
}

#[tokio::test]
async fn select_all_filters_logically_expired_entries() -> CacheResult<()> {
    let base = scratch_base();
    let cache = lazy_cache(base.path()).await;
    cache.insert(entry_in("live", 60_000, "v")).await?;
    cache.insert(entry_in("dead", -1_000, "v")).await?;

    let all = cache.select_all().await?;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].key.as_str(), "live");
    Ok(())
}

#[tokio::test]
async fn clean_all_empties_both_trees_and_the_mirror() -> CacheResult<()> {
    let base = scratch_base();
    let cache = crate::LocalFileCache::new(
        super::lazy_config(base.path()).with_mirror_to_memory(true),
    )
    .await?;
    for i in 0..3 {
        cache.insert(entry_in(&format!("k{i}"), 60_000, "v")).await?;
    }
    assert_eq!(file_count(base.path()), 6); // 3 entries + 3 markers

    cache.clean_all().await?;

    assert_eq!(file_count(base.path()), 0);
    assert!(cache.select_all().await?.is_empty());
    assert!(cache.memory().select_all().await?.is_empty());
    Ok(())
}
