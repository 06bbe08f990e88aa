//! File tier behavior tests.

mod basic;

use crate::{LocalFileCache, LocalFileCacheConfig};
use chrono::{DateTime, Utc};
use larder_core::CacheEntry;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

/// Fresh base directory with the `cache/` and `expirations/` trees the
/// tier requires. The guard keeps the directory alive for the test.
fn scratch_base() -> TempDir {
    let base = TempDir::new().unwrap();
    std::fs::create_dir(base.path().join("cache")).unwrap();
    std::fs::create_dir(base.path().join("expirations")).unwrap();
    base
}

/// Config with the disk sweeper disabled, so tests drive sweeps manually.
fn lazy_config(base: &Path) -> LocalFileCacheConfig {
    LocalFileCacheConfig::new(base).with_sweep_interval(Duration::ZERO)
}

async fn lazy_cache(base: &Path) -> LocalFileCache {
    LocalFileCache::new(lazy_config(base)).await.unwrap()
}

fn in_millis(from_now: i64) -> DateTime<Utc> {
    Utc::now() + chrono::Duration::milliseconds(from_now)
}

fn entry_in(key: &str, from_now_ms: i64, payload: &str) -> CacheEntry {
    CacheEntry::new(key, in_millis(from_now_ms), payload)
}

/// Regular files under `dir`, recursively.
fn file_count(dir: &Path) -> usize {
    let mut count = 0;
    for dirent in std::fs::read_dir(dir).unwrap() {
        let path = dirent.unwrap().path();
        if path.is_dir() {
            count += file_count(&path);
        } else {
            count += 1;
        }
    }
    count
}
