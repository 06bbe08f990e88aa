//! The durable file-backed cache tier.

use crate::codec::EntryCodec;
use crate::config::LocalFileCacheConfig;
use crate::locks::PathLocks;
use crate::paths;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use larder_core::{
    decorate_all, Cache, CacheEntry, CacheEntryKey, CacheError, CacheResult, Decorator,
    ExpirationDecider, OperationContext, ResultExt,
};
use larder_memory::{MemoryCache, MemoryCacheConfig};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Contents of one expiry marker file. Markers are always JSON, whatever
/// the entry format, so the sweeper can read them without the codec.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ExpiryMarker {
    pub(crate) key: CacheEntryKey,
    pub(crate) expires_at: DateTime<Utc>,
}

/// Cache layered over `<base>/cache/` and `<base>/expirations/`, with an
/// in-memory engine as its fast path.
///
/// Cloning is cheap; every clone shares the same directories, lock table,
/// L1 engine, and disk sweeper. Construction fails when either directory is
/// missing; nothing is created on the caller's behalf.
#[derive(Clone)]
pub struct LocalFileCache {
    pub(crate) inner: Arc<Inner>,
}

pub(crate) struct Inner {
    pub(crate) cache_dir: PathBuf,
    pub(crate) expirations_dir: PathBuf,
    pub(crate) extension: &'static str,
    pub(crate) codec: Arc<dyn EntryCodec>,
    delete_expired: bool,
    mirror_to_memory: bool,
    pub(crate) memory: MemoryCache,
    pub(crate) locks: PathLocks,
    pub(crate) decider: Arc<dyn ExpirationDecider>,
    insert_decorators: Vec<Arc<dyn Decorator<()>>>,
    select_decorators: Vec<Arc<dyn Decorator<Option<CacheEntry>>>>,
    pub(crate) sweeper: RwLock<Option<JoinHandle<()>>>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Some(handle) = self.sweeper.write().take() {
            handle.abort();
        }
    }
}

impl LocalFileCache {
    /// Opens the tier over `config.base_dir` and starts the disk sweeper
    /// when expired-file deletion is enabled.
    pub async fn new(config: LocalFileCacheConfig) -> CacheResult<Self> {
        let cache_dir = config.base_dir.join(paths::CACHE_DIR);
        let expirations_dir = config.base_dir.join(paths::EXPIRATIONS_DIR);
        require_directory(&cache_dir).await?;
        require_directory(&expirations_dir).await?;

        let memory = MemoryCache::new(
            MemoryCacheConfig::default().with_debug_tracing(config.debug_tracing),
        );
        let sweep_interval = config.sweep_interval;
        let delete_expired = config.delete_expired;
        let inner = Arc::new(Inner {
            cache_dir,
            expirations_dir,
            extension: config.file_format.extension(),
            codec: config.build_codec(),
            delete_expired,
            mirror_to_memory: config.mirror_to_memory,
            memory,
            locks: PathLocks::new(),
            decider: Arc::clone(&config.decider),
            insert_decorators: config.build_insert_decorators(),
            select_decorators: config.build_select_decorators(),
            sweeper: RwLock::new(None),
        });
        let cache = Self { inner };
        if delete_expired {
            crate::sweep::start(&cache, sweep_interval);
        }
        Ok(cache)
    }

    /// The wrapped in-memory engine.
    #[must_use]
    pub fn memory(&self) -> &MemoryCache {
        &self.inner.memory
    }

    fn entry_path(&self, key: &CacheEntryKey) -> PathBuf {
        paths::entry_path(&self.inner.cache_dir, key, self.inner.extension)
    }

    async fn insert_now(&self, entry: CacheEntry) -> CacheResult<()> {
        paths::validate_key(&entry.key)?;

        let path = self.entry_path(&entry.key);
        let lock = self.inner.locks.lock_for(&path);
        let _guard = lock.lock().await;

        // Checked under the path lock: racing writers for one key queue up
        // here, and only the first finds no live entry.
        if self.select_now(&entry.key).await?.is_some() {
            return Err(CacheError::already_persisted(entry.key.clone()));
        }

        if self.inner.delete_expired {
            self.write_marker(&entry).await?;
        }

        let bytes = self.inner.codec.encode(&entry)?;
        self.write_atomically(&path, &bytes).await?;

        if self.inner.mirror_to_memory {
            match self.inner.memory.insert(entry).await {
                // The disk copy is authoritative; a leftover live mirror
                // entry is not a failure of this insert.
                Ok(()) | Err(CacheError::AlreadyPersisted { .. }) => {}
                Err(error) => return Err(error),
            }
        }
        Ok(())
    }

    async fn write_marker(&self, entry: &CacheEntry) -> CacheResult<()> {
        let path = paths::marker_path(
            &self.inner.expirations_dir,
            entry.expires_at,
            &entry.key,
            self.inner.extension,
        );
        // The per-timestamp folder appears on first use.
        if let Some(folder) = path.parent() {
            fs::create_dir_all(folder)
                .await
                .map_err(|e| CacheError::io(folder, "create expiration folder", e))?;
        }
        let marker = ExpiryMarker {
            key: entry.key.clone(),
            expires_at: entry.expires_at,
        };
        let bytes = serde_json::to_vec(&marker).context("encode expiry marker")?;
        // Same per-path lock the cleaner and sweeper take before deleting
        // this marker. Always acquired after the entry file's lock.
        let lock = self.inner.locks.lock_for(&path);
        let _guard = lock.lock().await;
        fs::write(&path, bytes)
            .await
            .map_err(|e| CacheError::io(&path, "write expiry marker", e))
    }

    /// Writes via a uuid-named temp file and a rename, so a concurrent
    /// reader never sees a torn entry.
    async fn write_atomically(&self, path: &Path, bytes: &[u8]) -> CacheResult<()> {
        let temp = self
            .inner
            .cache_dir
            .join(format!(".{}.tmp", Uuid::new_v4()));
        fs::write(&temp, bytes)
            .await
            .map_err(|e| CacheError::io(&temp, "write entry file", e))?;
        match fs::rename(&temp, path).await {
            Ok(()) => Ok(()),
            Err(e) => {
                let _ = fs::remove_file(&temp).await;
                Err(CacheError::io(path, "rename entry file", e))
            }
        }
    }

    async fn select_now(&self, key: &CacheEntryKey) -> CacheResult<Option<CacheEntry>> {
        if self.inner.mirror_to_memory {
            if let Some(found) = self.inner.memory.select(key).await? {
                return Ok(Some(found));
            }
        }
        if paths::validate_key(key).is_err() {
            // Such a key can never have been written.
            return Ok(None);
        }
        self.read_entry(&self.entry_path(key)).await
    }

    async fn read_entry(&self, path: &Path) -> CacheResult<Option<CacheEntry>> {
        let bytes = match fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CacheError::io(path, "read entry file", e)),
        };
        match self.inner.codec.decode(&bytes) {
            Ok(entry) if entry.is_live(Utc::now()) => Ok(Some(entry)),
            Ok(_) => Ok(None),
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "undecodable entry file read as a miss");
                Ok(None)
            }
        }
    }

    async fn select_all_now(&self) -> CacheResult<Vec<CacheEntry>> {
        let mut dir = fs::read_dir(&self.inner.cache_dir)
            .await
            .map_err(|e| CacheError::io(&self.inner.cache_dir, "list cache directory", e))?;
        let mut found = Vec::new();
        loop {
            let dirent = match dir.next_entry().await {
                Ok(Some(dirent)) => dirent,
                Ok(None) => break,
                Err(e) => {
                    return Err(CacheError::io(&self.inner.cache_dir, "list cache directory", e))
                }
            };
            let path = dirent.path();
            let is_entry_file = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.ends_with(self.inner.extension));
            if !is_entry_file {
                continue;
            }
            // A file the sweeper deleted mid-enumeration reads as absent.
            if let Some(entry) = self.read_entry(&path).await? {
                found.push(entry);
            }
        }
        Ok(found)
    }

    async fn clean_cache_tree(&self) -> CacheResult<()> {
        let mut dir = fs::read_dir(&self.inner.cache_dir)
            .await
            .map_err(|e| CacheError::io(&self.inner.cache_dir, "list cache directory", e))?;
        while let Some(dirent) = dir
            .next_entry()
            .await
            .map_err(|e| CacheError::io(&self.inner.cache_dir, "list cache directory", e))?
        {
            let path = dirent.path();
            let lock = self.inner.locks.lock_for(&path);
            let _guard = lock.lock().await;
            remove_file_if_present(&path).await?;
        }
        Ok(())
    }

    async fn clean_expirations_tree(&self) -> CacheResult<()> {
        let mut dir = fs::read_dir(&self.inner.expirations_dir)
            .await
            .map_err(|e| CacheError::io(&self.inner.expirations_dir, "list expirations", e))?;
        while let Some(folder) = dir
            .next_entry()
            .await
            .map_err(|e| CacheError::io(&self.inner.expirations_dir, "list expirations", e))?
        {
            let folder_path = folder.path();
            if !folder_path.is_dir() {
                remove_file_if_present(&folder_path).await?;
                continue;
            }
            let mut markers = fs::read_dir(&folder_path)
                .await
                .map_err(|e| CacheError::io(&folder_path, "list expiration folder", e))?;
            while let Some(marker) = markers
                .next_entry()
                .await
                .map_err(|e| CacheError::io(&folder_path, "list expiration folder", e))?
            {
                let marker_path = marker.path();
                let lock = self.inner.locks.lock_for(&marker_path);
                let _guard = lock.lock().await;
                remove_file_if_present(&marker_path).await?;
            }
            let _ = fs::remove_dir(&folder_path).await;
        }
        Ok(())
    }
}

#[async_trait]
impl Cache for LocalFileCache {
    async fn insert(&self, entry: CacheEntry) -> CacheResult<()> {
        let ctx = OperationContext::new("insert", entry.key.as_str());
        let this = self.clone();
        let op = Box::pin(async move { this.insert_now(entry).await });
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
        let op = Box::pin(async move { this.select_now(&key).await });
        decorate_all(&self.inner.select_decorators, &ctx, op).await
    }

    async fn select_all(&self) -> CacheResult<Vec<CacheEntry>> {
        self.select_all_now().await
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
        let cache_tree = self.clone();
        let cache_task = tokio::spawn(async move { cache_tree.clean_cache_tree().await });
        let expirations_tree = self.clone();
        let expirations_task =
            tokio::spawn(async move { expirations_tree.clean_expirations_tree().await });
        cache_task.await??;
        expirations_task.await??;
        self.inner.memory.clean_all().await
    }
}

impl fmt::Debug for LocalFileCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalFileCache")
            .field("cache_dir", &self.inner.cache_dir)
            .field("expirations_dir", &self.inner.expirations_dir)
            .field("extension", &self.inner.extension)
            .finish()
    }
}

async fn require_directory(path: &Path) -> CacheResult<()> {
    match fs::metadata(path).await {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(CacheError::startup_failure(format!(
            "'{}' exists but is not a directory",
            path.display()
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(CacheError::startup_failure(
            format!("required directory '{}' does not exist", path.display()),
        )),
        Err(e) => Err(CacheError::io(path, "inspect required directory", e)),
    }
}

pub(crate) async fn remove_file_if_present(path: &Path) -> CacheResult<()> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(CacheError::io(path, "remove file", e)),
    }
}
