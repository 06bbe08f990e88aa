//! Default expiration policy.

use chrono::{DateTime, Utc};
use larder_core::{CacheEntryKey, ExpirationDecider};

/// Removes a bucket once its timestamp is no longer in the future.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampPassedDecider;

impl ExpirationDecider for TimestampPassedDecider {
    fn should_remove(&self, _keys: &[CacheEntryKey], expires_at: DateTime<Utc>) -> bool {
        expires_at <= Utc::now()
    }
}
