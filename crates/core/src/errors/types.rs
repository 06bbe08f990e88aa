//! Core error type definitions

use crate::entry::CacheEntryKey;
use std::path::PathBuf;
use std::time::Duration;

/// Result type alias for cache operations
pub type CacheResult<T> = std::result::Result<T, CacheError>;

/// Every failure a cache operation can surface.
///
/// The set is closed on purpose: implementations map internal failures onto
/// one of these variants instead of panicking or leaking source-specific
/// error types across the capability boundary.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Insert targeted a key that already holds a live entry
    AlreadyPersisted { key: CacheEntryKey },

    /// A cache could not be brought up (missing directories, bad layout)
    StartupFailure { message: String },

    /// A decorated operation ran past its budget and was cancelled
    TimeoutExceeded { operation: String, budget: Duration },

    /// File system operations
    Io {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// Fallback for failures outside the variants above, keeping the cause
    Unknown {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}
