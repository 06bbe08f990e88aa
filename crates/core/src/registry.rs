//! Explicitly constructed holders for shared cache instances.
//!
//! Nothing here is a global: a component constructs the registry it needs,
//! owns it, and hands references to its collaborators.

use crate::capability::Cache;
use dashmap::DashMap;
use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::Arc;

/// Holds at most one cache for the component that owns it.
///
/// The first install wins; later installs are silently ignored so wiring
/// code can be idempotent.
#[derive(Default)]
pub struct SingleCache {
    slot: OnceCell<Arc<dyn Cache>>,
}

impl SingleCache {
    #[must_use]
    pub fn new() -> Self {
        Self {
            slot: OnceCell::new(),
        }
    }

    pub fn install(&self, cache: Arc<dyn Cache>) {
        let _ = self.slot.set(cache);
    }

    #[must_use]
    pub fn get(&self) -> Option<Arc<dyn Cache>> {
        self.slot.get().cloned()
    }

    #[must_use]
    pub fn is_installed(&self) -> bool {
        self.slot.get().is_some()
    }
}

impl fmt::Debug for SingleCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingleCache")
            .field("installed", &self.is_installed())
            .finish()
    }
}

/// Named collection of caches.
///
/// Inserting under an existing name replaces the previous instance; lookups
/// clone the shared handle out.
#[derive(Default)]
pub struct CacheRegistry {
    entries: DashMap<String, Arc<dyn Cache>>,
}

impl CacheRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    pub fn insert(&self, name: impl Into<String>, cache: Arc<dyn Cache>) {
        self.entries.insert(name.into(), cache);
    }

    pub fn remove(&self, name: &str) -> Option<Arc<dyn Cache>> {
        self.entries.remove(name).map(|(_, cache)| cache)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn Cache>> {
        self.entries.get(name).map(|entry| entry.value().clone())
    }

    /// Every registered cache, in no particular order.
    #[must_use]
    pub fn all(&self) -> Vec<Arc<dyn Cache>> {
        self.entries.iter().map(|entry| entry.value().clone()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for CacheRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheRegistry")
            .field("entries", &self.len())
            .finish()
    }
}
