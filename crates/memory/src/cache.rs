//! The expiring cache engine.

use crate::config::MemoryCacheConfig;
use crate::stats::{CacheStats, StatsSnapshot};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use futures::future::join_all;
use larder_core::{
    decorate_all, Cache, CacheEntry, CacheEntryKey, CacheError, CacheResult, Decorator,
    ExpirationDecider, OperationContext,
};
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Expiring in-memory cache.
///
/// Cloning is cheap; every clone shares the same store, expiration index,
/// and background sweeper. Construction must happen inside a Tokio runtime
/// because the sweeper is spawned onto it.
#[derive(Clone)]
pub struct MemoryCache {
    pub(crate) inner: Arc<Inner>,
}

pub(crate) struct Inner {
    /// Primary store.
    pub(crate) entries: DashMap<CacheEntryKey, CacheEntry>,
    /// Expiration index: one bucket of keys per expiry instant.
    pub(crate) expirations: DashMap<DateTime<Utc>, Vec<CacheEntryKey>>,
    /// Serializes the two compound index paths: insert's
    /// check-register-store and the sweeper's collect-delete. Always taken
    /// before any store shard lock.
    pub(crate) index_lock: Mutex<()>,
    pub(crate) decider: Arc<dyn ExpirationDecider>,
    insert_decorators: Vec<Arc<dyn Decorator<()>>>,
    select_decorators: Vec<Arc<dyn Decorator<Option<CacheEntry>>>>,
    pub(crate) stats: CacheStats,
    pub(crate) sweeper: RwLock<Option<JoinHandle<()>>>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Some(handle) = self.sweeper.write().take() {
            handle.abort();
        }
    }
}

impl MemoryCache {
    /// Creates the engine and starts its sweeper (skipped when the
    /// configured interval is zero).
    #[must_use]
    pub fn new(config: MemoryCacheConfig) -> Self {
        let sweep_interval = config.sweep_interval;
        let inner = Arc::new(Inner {
            entries: DashMap::new(),
            expirations: DashMap::new(),
            index_lock: Mutex::new(()),
            decider: Arc::clone(&config.decider),
            insert_decorators: config.build_insert_decorators(),
            select_decorators: config.build_select_decorators(),
            stats: CacheStats::default(),
            sweeper: RwLock::new(None),
        });
        let cache = Self { inner };
        crate::sweep::start(&cache, sweep_interval);
        cache
    }

    /// Number of physically stored entries, including expired ones the
    /// sweeper has not visited yet.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.entries.is_empty()
    }

    /// Counters accumulated since construction.
    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.inner.stats.snapshot()
    }

    #[cfg(test)]
    pub(crate) fn bucket_count(&self) -> usize {
        self.inner.expirations.len()
    }

    fn insert_now(&self, entry: CacheEntry) -> CacheResult<()> {
        let now = Utc::now();
        let _guard = self.inner.index_lock.lock();

        let stale_expiry = {
            match self.inner.entries.get(&entry.key) {
                Some(existing) if existing.is_live(now) => {
                    return Err(CacheError::already_persisted(entry.key.clone()));
                }
                Some(existing) => Some(existing.expires_at),
                None => None,
            }
        };
        // A dead entry the sweeper has not visited yet is replaced; its key
        // must leave the old bucket first so it stays reachable from
        // exactly one bucket.
        if let Some(old_expiry) = stale_expiry {
            self.deregister(&entry.key, old_expiry);
        }

        self.inner
            .expirations
            .entry(entry.expires_at)
            .or_default()
            .push(entry.key.clone());
        self.inner.entries.insert(entry.key.clone(), entry);
        self.inner.stats.record_insert();
        Ok(())
    }

    /// Drops `key` from the bucket stamped `expires_at`. Callers hold the
    /// index lock.
    fn deregister(&self, key: &CacheEntryKey, expires_at: DateTime<Utc>) {
        let emptied = match self.inner.expirations.get_mut(&expires_at) {
            Some(mut bucket) => {
                bucket.retain(|registered| registered != key);
                bucket.is_empty()
            }
            None => false,
        };
        if emptied {
            self.inner
                .expirations
                .remove_if(&expires_at, |_, bucket| bucket.is_empty());
        }
    }

    fn select_now(&self, key: &CacheEntryKey) -> Option<CacheEntry> {
        let now = Utc::now();
        let found = self.inner.entries.get(key).and_then(|entry| {
            if entry.is_live(now) {
                Some(entry.value().clone())
            } else {
                // Logically expired; left in place for the sweeper.
                None
            }
        });
        match &found {
            Some(_) => self.inner.stats.record_hit(),
            None => self.inner.stats.record_miss(),
        }
        found
    }

    fn select_all_now(&self) -> Vec<CacheEntry> {
        let now = Utc::now();
        self.inner
            .entries
            .iter()
            .filter(|entry| entry.value().is_live(now))
            .map(|entry| entry.value().clone())
            .collect()
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn insert(&self, entry: CacheEntry) -> CacheResult<()> {
        let ctx = OperationContext::new("insert", entry.key.as_str());
        let this = self.clone();
        let op = Box::pin(async move { this.insert_now(entry) });
        decorate_all(&self.inner.insert_decorators, &ctx, op).await
    }

    async fn insert_many(&self, entries: Vec<CacheEntry>) -> CacheResult<()> {
        let handles: Vec<_> = entries
            .into_iter()
            .map(|entry| self.spawn_insert(entry))
            .collect();
        for joined in join_all(handles).await {
            joined??;
        }
        Ok(())
    }

    fn spawn_insert(&self, entry: CacheEntry) -> JoinHandle<CacheResult<()>> {
        let cache = self.clone();
        tokio::spawn(async move { cache.insert(entry).await })
    }

    async fn select(&self, key: &CacheEntryKey) -> CacheResult<Option<CacheEntry>> {
        let ctx = OperationContext::new("select", key.as_str());
        let this = self.clone();
        let key = key.clone();
        let op = Box::pin(async move { Ok(this.select_now(&key)) });
        decorate_all(&self.inner.select_decorators, &ctx, op).await
    }

    async fn select_all(&self) -> CacheResult<Vec<CacheEntry>> {
        Ok(self.select_all_now())
    }

    fn spawn_select(&self, key: CacheEntryKey) -> JoinHandle<CacheResult<Option<CacheEntry>>> {
        let cache = self.clone();
        tokio::spawn(async move { cache.select(&key).await })
    }

    fn spawn_select_all(&self) -> JoinHandle<CacheResult<Vec<CacheEntry>>> {
        let cache = self.clone();
        tokio::spawn(async move { cache.select_all().await })
    }

    async fn clean_all(&self) -> CacheResult<()> {
        let store = self.clone();
        let store_task = tokio::spawn(async move {
            let dropped = store.inner.entries.len() as u64;
            store.inner.entries.clear();
            store.inner.stats.record_removals(dropped);
        });
        let index = self.clone();
        let index_task = tokio::spawn(async move {
            let _guard = index.inner.index_lock.lock();
            index.inner.expirations.clear();
        });
        store_task.await?;
        index_task.await?;
        Ok(())
    }
}

impl fmt::Debug for MemoryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryCache")
            .field("entry_count", &self.inner.entries.len())
            .field("bucket_count", &self.inner.expirations.len())
            .finish()
    }
}
