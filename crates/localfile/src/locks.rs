//! Per-path write locks.

use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Hands out one mutex per file path so writers, the cleaner, and the disk
/// sweeper serialize on the files they actually share instead of on one
/// global lock.
#[derive(Default)]
pub(crate) struct PathLocks {
    locks: DashMap<PathBuf, Arc<Mutex<()>>>,
}

impl PathLocks {
    pub(crate) fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// The mutex guarding `path`. Cloned out of the map so no shard guard
    /// is held across an await.
    pub(crate) fn lock_for(&self, path: &Path) -> Arc<Mutex<()>> {
        self.locks
            .entry(path.to_path_buf())
            .or_default()
            .value()
            .clone()
    }
}
