//! Builder methods for creating errors with context

use super::types::CacheError;
use crate::entry::CacheEntryKey;
use std::path::PathBuf;
use std::time::Duration;

impl CacheError {
    /// Create an already-persisted rejection for `key`
    #[must_use]
    pub fn already_persisted(key: impl Into<CacheEntryKey>) -> Self {
        CacheError::AlreadyPersisted { key: key.into() }
    }

    /// Create a startup failure
    #[must_use]
    pub fn startup_failure(message: impl Into<String>) -> Self {
        CacheError::StartupFailure {
            message: message.into(),
        }
    }

    /// Create a timeout error for a budget overrun
    #[must_use]
    pub fn timeout_exceeded(operation: impl Into<String>, budget: Duration) -> Self {
        CacheError::TimeoutExceeded {
            operation: operation.into(),
            budget,
        }
    }

    /// Create a file system error with context
    #[must_use]
    pub fn io(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        CacheError::Io {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }

    /// Create a fallback error without a cause
    #[must_use]
    pub fn unknown(message: impl Into<String>) -> Self {
        CacheError::Unknown {
            message: message.into(),
            source: None,
        }
    }

    /// Create a fallback error wrapping its cause
    #[must_use]
    pub fn unknown_with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        CacheError::Unknown {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}
