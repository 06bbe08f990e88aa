//! Conversion implementations for error types

use super::types::CacheError;
use std::path::PathBuf;

// Conversion implementations (the builders carry more context; these cover
// `?` on sources that reach the boundary without a path or operation name)
impl From<std::io::Error> for CacheError {
    fn from(error: std::io::Error) -> Self {
        CacheError::Io {
            path: PathBuf::new(),
            operation: "unknown".to_string(),
            source: error,
        }
    }
}

impl From<serde_json::Error> for CacheError {
    fn from(error: serde_json::Error) -> Self {
        CacheError::Unknown {
            message: "JSON serialization failed".to_string(),
            source: Some(Box::new(error)),
        }
    }
}

impl From<tokio::task::JoinError> for CacheError {
    fn from(error: tokio::task::JoinError) -> Self {
        CacheError::Unknown {
            message: "spawned cache task failed".to_string(),
            source: Some(Box::new(error)),
        }
    }
}
