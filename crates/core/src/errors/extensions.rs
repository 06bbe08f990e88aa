//! Extension traits for error handling

use super::types::{CacheError, CacheResult};

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Wrap the error in [`CacheError::Unknown`], keeping it as the cause
    fn context(self, message: impl Into<String>) -> CacheResult<T>;

    /// Like [`ResultExt::context`] with a lazily built message
    fn with_context<F>(self, f: F) -> CacheResult<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, message: impl Into<String>) -> CacheResult<T> {
        self.map_err(|e| CacheError::unknown_with_source(message, e))
    }

    fn with_context<F>(self, f: F) -> CacheResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| CacheError::unknown_with_source(f(), e))
    }
}
