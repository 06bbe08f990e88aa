//! Concurrent engine behavior tests

use super::{entry_in, lazy_cache};
use crate::{MemoryCache, MemoryCacheConfig};
use futures::future::join_all;
use larder_core::{Cache, CacheError, CacheResult};
use std::time::Duration;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_inserts_for_one_key_admit_exactly_one() {
    let cache = lazy_cache();

    let handles: Vec<_> = (0..16)
        .map(|i| cache.spawn_insert(entry_in("contended", 60_000, &format!("writer-{i}"))))
        .collect();
    let results: Vec<CacheResult<()>> = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    let admitted = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(admitted, 1, "exactly one writer wins the key");
    assert!(results
        .iter()
        .filter(|r| r.is_err())
        .all(|r| matches!(r, Err(CacheError::AlreadyPersisted { .. }))));

    assert_eq!(cache.len(), 1);
    assert_eq!(cache.bucket_count(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn distinct_keys_insert_in_parallel_without_loss() -> CacheResult<()> {
    let cache = lazy_cache();

    let handles: Vec<_> = (0..100)
        .map(|i| cache.spawn_insert(entry_in(&format!("k{i}"), 60_000, "v")))
        .collect();
    for joined in join_all(handles).await {
        joined.unwrap()?;
    }

    assert_eq!(cache.select_all().await?.len(), 100);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn inserts_racing_the_sweeper_settle_consistently() -> CacheResult<()> {
    let cache = MemoryCache::new(
        MemoryCacheConfig::default().with_sweep_interval(Duration::from_millis(5)),
    );

    let handles: Vec<_> = (0..40)
        .map(|i| {
            // Half the entries expire almost immediately, under the
            // sweeper's nose; the rest outlive the test.
            let expiry = if i % 2 == 0 { 20 } else { 60_000 };
            cache.spawn_insert(entry_in(&format!("k{i}"), expiry, "v"))
        })
        .collect();
    for joined in join_all(handles).await {
        joined.unwrap()?;
    }

    tokio::time::sleep(Duration::from_millis(300)).await;

    let survivors = cache.select_all().await?;
    assert_eq!(survivors.len(), 20);
    assert!(survivors
        .iter()
        .all(|e| e.key.as_str()[1..].parse::<u32>().unwrap() % 2 == 1));
    assert_eq!(cache.len(), 20);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn clean_all_races_concurrent_readers_safely() -> CacheResult<()> {
    let cache = lazy_cache();
    for i in 0..50 {
        cache.insert(entry_in(&format!("k{i}"), 60_000, "v")).await?;
    }

    let readers: Vec<_> = (0..8).map(|_| cache.spawn_select_all()).collect();
    cache.clean_all().await?;

    // Readers observe either view, never an error.
    for joined in join_all(readers).await {
        joined.unwrap()?;
    }
    assert!(cache.is_empty());
    Ok(())
}
