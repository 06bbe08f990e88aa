//! The entry model shared by every cache tier.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier for a cache entry.
///
/// Keys carry no structure beyond equality and hashing; tiers that map keys
/// onto external resources (file names, …) impose their own restrictions at
/// the point of use.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheEntryKey(String);

impl CacheEntryKey {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheEntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CacheEntryKey {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for CacheEntryKey {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One cached value together with the instant it stops being served.
///
/// Entries are immutable once constructed; replacing a value means inserting
/// a new entry after the previous one has expired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: CacheEntryKey,
    pub expires_at: DateTime<Utc>,
    pub payload: String,
}

impl CacheEntry {
    #[must_use]
    pub fn new(
        key: impl Into<CacheEntryKey>,
        expires_at: DateTime<Utc>,
        payload: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            expires_at,
            payload: payload.into(),
        }
    }

    /// An entry is live strictly before its expiry instant.
    #[must_use]
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}
