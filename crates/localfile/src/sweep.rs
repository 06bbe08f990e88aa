//! Background sweeping of expired on-disk entries.

use crate::cache::{remove_file_if_present, Inner, LocalFileCache};
use crate::paths;
use chrono::{DateTime, Utc};
use larder_core::{CacheEntryKey, CacheError, CacheResult};
use std::path::Path;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::fs;
use tracing::{debug, warn};

pub(crate) fn start(cache: &LocalFileCache, sweep_interval: Duration) {
    if sweep_interval == Duration::ZERO {
        return;
    }

    // Weak handle: dropping the last cache clone ends the loop.
    let weak: Weak<Inner> = Arc::downgrade(&cache.inner);
    let handle = tokio::spawn(async move {
        let mut interval = tokio::time::interval(sweep_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            match weak.upgrade() {
                Some(inner) => {
                    if let Err(error) = sweep_cycle(&inner).await {
                        warn!(%error, "disk sweep cycle failed");
                    }
                }
                None => break,
            }
        }
    });

    *cache.inner.sweeper.write() = Some(handle);
}

/// One pass over `expirations/`: every folder the decider approves loses
/// its referenced entry files, its markers, and finally itself. A bad
/// folder is logged and skipped, never fatal to the pass.
pub(crate) async fn sweep_cycle(inner: &Inner) -> CacheResult<()> {
    let mut dir = fs::read_dir(&inner.expirations_dir)
        .await
        .map_err(|e| CacheError::io(&inner.expirations_dir, "list expirations", e))?;

    while let Some(folder) = dir
        .next_entry()
        .await
        .map_err(|e| CacheError::io(&inner.expirations_dir, "list expirations", e))?
    {
        let folder_path = folder.path();
        let Some(name) = folder_path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(expires_at) = paths::parse_timestamp_dirname(name) else {
            debug!(folder = name, "ignoring foreign folder under expirations");
            continue;
        };
        if let Err(error) = sweep_folder(inner, &folder_path, expires_at).await {
            warn!(folder = name, %error, "failed to sweep expiration folder");
        }
    }
    Ok(())
}

async fn sweep_folder(
    inner: &Inner,
    folder: &Path,
    expires_at: DateTime<Utc>,
) -> CacheResult<()> {
    let mut markers = Vec::new();
    let mut keys = Vec::new();
    let mut dir = fs::read_dir(folder)
        .await
        .map_err(|e| CacheError::io(folder, "list expiration folder", e))?;
    while let Some(marker) = dir
        .next_entry()
        .await
        .map_err(|e| CacheError::io(folder, "list expiration folder", e))?
    {
        let path = marker.path();
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            keys.push(CacheEntryKey::new(stem));
        }
        markers.push(path);
    }

    if !inner.decider.should_remove(&keys, expires_at) {
        return Ok(());
    }

    let mut removed = 0u64;
    for marker in &markers {
        let Some(file_name) = marker.file_name() else {
            continue;
        };
        let entry_file = inner.cache_dir.join(file_name);
        let lock = inner.locks.lock_for(&entry_file);
        let _guard = lock.lock().await;

        // The key may have been re-inserted since this marker was written;
        // a still-live entry file stays, only the stale marker goes.
        if !entry_is_live(inner, &entry_file).await {
            remove_file_if_present(&entry_file).await?;
            removed += 1;
        }
        remove_file_if_present(marker).await?;
    }

    // Fails while a writer is adding a fresh marker; retried next cycle.
    let _ = fs::remove_dir(folder).await;
    if removed > 0 {
        debug!(bucket = %expires_at, entries = removed, "expired files removed");
    }
    Ok(())
}

async fn entry_is_live(inner: &Inner, entry_file: &Path) -> bool {
    match fs::read(entry_file).await {
        Ok(bytes) => inner
            .codec
            .decode(&bytes)
            .map(|entry| entry.is_live(Utc::now()))
            .unwrap_or(false),
        Err(_) => false,
    }
}
