//! The cache capability implemented by every tier.

use crate::entry::{CacheEntry, CacheEntryKey};
use crate::errors::CacheResult;
use async_trait::async_trait;
use tokio::task::JoinHandle;

/// A key-value cache of expiring entries.
///
/// Implementations are shared handles: every method takes `&self`, so an
/// `Arc<dyn Cache>` can serve many tasks at once. No method panics across
/// this boundary; every failure is a [`CacheError`](crate::errors::CacheError)
/// carried in the result.
///
/// The `spawn_` variants run the operation as a task on the runtime and hand
/// back its [`JoinHandle`]. Callers that only want fire-and-forget semantics
/// drop the handle; callers that need the outcome await it.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Stores `entry` unless its key already holds a live entry.
    async fn insert(&self, entry: CacheEntry) -> CacheResult<()>;

    /// Stores every entry concurrently. Succeeds only when every element
    /// succeeded; there is no rollback for the elements that did.
    async fn insert_many(&self, entries: Vec<CacheEntry>) -> CacheResult<()>;

    /// Starts an insert without waiting for it.
    fn spawn_insert(&self, entry: CacheEntry) -> JoinHandle<CacheResult<()>>;

    /// Returns the live entry stored under `key`, if any. Entries past
    /// their expiry read as absent even before any sweep removes them.
    async fn select(&self, key: &CacheEntryKey) -> CacheResult<Option<CacheEntry>>;

    /// Returns every live entry.
    async fn select_all(&self) -> CacheResult<Vec<CacheEntry>>;

    /// Starts a select without waiting for it.
    fn spawn_select(&self, key: CacheEntryKey) -> JoinHandle<CacheResult<Option<CacheEntry>>>;

    /// Starts a select-all without waiting for it.
    fn spawn_select_all(&self) -> JoinHandle<CacheResult<Vec<CacheEntry>>>;

    /// Removes every entry and every piece of expiration bookkeeping.
    async fn clean_all(&self) -> CacheResult<()>;
}
