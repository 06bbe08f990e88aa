//! Policy hook for expiration sweeps.

use crate::entry::CacheEntryKey;
use chrono::{DateTime, Utc};

/// Decides whether an expiration bucket may be removed.
///
/// Sweepers hand the decider every bucket they visit; only buckets it
/// approves are deleted, so grace periods or deferred deletion can be
/// plugged in without touching the sweep loops. Implementations must be
/// cheap and must not block.
pub trait ExpirationDecider: Send + Sync {
    /// `keys` are the members of the bucket stamped `expires_at`.
    fn should_remove(&self, keys: &[CacheEntryKey], expires_at: DateTime<Utc>) -> bool;
}
