//! Display implementations for error types

use super::types::CacheError;
use std::fmt;

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheError::AlreadyPersisted { key } => {
                write!(f, "cache entry '{key}' has already been persisted")
            }
            CacheError::StartupFailure { message } => {
                write!(f, "cache startup failed: {message}")
            }
            CacheError::TimeoutExceeded { operation, budget } => {
                write!(f, "operation '{operation}' timed out after {budget:?}")
            }
            CacheError::Io {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "file system {} operation failed for '{}': {}",
                    operation,
                    path.display(),
                    source
                )
            }
            CacheError::Unknown { message, source } => match source {
                Some(source) => write!(f, "{message}: {source}"),
                None => write!(f, "{message}"),
            },
        }
    }
}
