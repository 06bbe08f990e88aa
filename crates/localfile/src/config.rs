//! File tier configuration.

use crate::codec::{BincodeCodec, EntryCodec, JsonCodec};
use larder_core::{CacheEntry, Decorator, ExpirationDecider};
use larder_decorators::{TimeoutDecorator, TracingDecorator};
use larder_memory::TimestampPassedDecider;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Encoding used for the entry and marker files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileFormat {
    /// Human-readable text, `.txt`.
    #[default]
    Text,
    /// JSON, `.json`.
    Json,
    /// Compact binary, `.bin`.
    Binary,
}

impl FileFormat {
    /// File extension, dot included.
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            FileFormat::Text => ".txt",
            FileFormat::Json => ".json",
            FileFormat::Binary => ".bin",
        }
    }

    pub(crate) fn default_codec(&self) -> Arc<dyn EntryCodec> {
        match self {
            FileFormat::Text | FileFormat::Json => Arc::new(JsonCodec),
            FileFormat::Binary => Arc::new(BincodeCodec),
        }
    }
}

/// Tuning knobs for [`LocalFileCache`](crate::LocalFileCache).
///
/// Only `base_dir` is mandatory; the defaults match the common deployment:
/// expired files are deleted by the disk sweeper, nothing is mirrored into
/// memory, and entries are stored as text.
#[derive(Clone)]
pub struct LocalFileCacheConfig {
    /// Directory holding the `cache/` and `expirations/` trees. Both must
    /// already exist; construction never creates them.
    pub base_dir: PathBuf,
    /// Write expiry markers and run the disk sweeper.
    pub delete_expired: bool,
    /// Mirror every insert into the wrapped in-memory engine.
    pub mirror_to_memory: bool,
    pub file_format: FileFormat,
    /// Forces the tracing decorator on even when DEBUG logging is off.
    pub debug_tracing: bool,
    /// Pace of the disk sweeper. Zero disables it even when
    /// `delete_expired` is set.
    pub sweep_interval: Duration,
    pub insert_timeout: Duration,
    pub select_timeout: Duration,
    /// Replaces the format's default codec.
    pub codec: Option<Arc<dyn EntryCodec>>,
    /// Policy consulted by the disk sweeper before it removes a folder.
    pub decider: Arc<dyn ExpirationDecider>,
    pub insert_decorators: Option<Vec<Arc<dyn Decorator<()>>>>,
    pub select_decorators: Option<Vec<Arc<dyn Decorator<Option<CacheEntry>>>>>,
}

impl LocalFileCacheConfig {
    #[must_use]
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            delete_expired: true,
            mirror_to_memory: false,
            file_format: FileFormat::Text,
            debug_tracing: false,
            sweep_interval: Duration::from_millis(250),
            insert_timeout: Duration::from_millis(400),
            select_timeout: Duration::from_millis(1500),
            codec: None,
            decider: Arc::new(TimestampPassedDecider),
            insert_decorators: None,
            select_decorators: None,
        }
    }

    #[must_use]
    pub fn with_delete_expired(mut self, enabled: bool) -> Self {
        self.delete_expired = enabled;
        self
    }

    #[must_use]
    pub fn with_mirror_to_memory(mut self, enabled: bool) -> Self {
        self.mirror_to_memory = enabled;
        self
    }

    #[must_use]
    pub fn with_file_format(mut self, format: FileFormat) -> Self {
        self.file_format = format;
        self
    }

    #[must_use]
    pub fn with_debug_tracing(mut self, enabled: bool) -> Self {
        self.debug_tracing = enabled;
        self
    }

    #[must_use]
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    #[must_use]
    pub fn with_insert_timeout(mut self, budget: Duration) -> Self {
        self.insert_timeout = budget;
        self
    }

    #[must_use]
    pub fn with_select_timeout(mut self, budget: Duration) -> Self {
        self.select_timeout = budget;
        self
    }

    #[must_use]
    pub fn with_codec(mut self, codec: Arc<dyn EntryCodec>) -> Self {
        self.codec = Some(codec);
        self
    }

    #[must_use]
    pub fn with_decider(mut self, decider: Arc<dyn ExpirationDecider>) -> Self {
        self.decider = decider;
        self
    }

    #[must_use]
    pub fn with_insert_decorators(mut self, decorators: Vec<Arc<dyn Decorator<()>>>) -> Self {
        self.insert_decorators = Some(decorators);
        self
    }

    #[must_use]
    pub fn with_select_decorators(
        mut self,
        decorators: Vec<Arc<dyn Decorator<Option<CacheEntry>>>>,
    ) -> Self {
        self.select_decorators = Some(decorators);
        self
    }

    pub(crate) fn build_codec(&self) -> Arc<dyn EntryCodec> {
        match &self.codec {
            Some(codec) => Arc::clone(codec),
            None => self.file_format.default_codec(),
        }
    }

    pub(crate) fn build_insert_decorators(&self) -> Vec<Arc<dyn Decorator<()>>> {
        match &self.insert_decorators {
            Some(decorators) => decorators.clone(),
            None => vec![
                Arc::new(TimeoutDecorator::new(self.insert_timeout)) as Arc<dyn Decorator<()>>,
                Arc::new(TracingDecorator::new(self.debug_tracing)),
            ],
        }
    }

    pub(crate) fn build_select_decorators(&self) -> Vec<Arc<dyn Decorator<Option<CacheEntry>>>> {
        match &self.select_decorators {
            Some(decorators) => decorators.clone(),
            None => vec![
                Arc::new(TimeoutDecorator::new(self.select_timeout))
                    as Arc<dyn Decorator<Option<CacheEntry>>>,
                Arc::new(TracingDecorator::new(self.debug_tracing)),
            ],
        }
    }
}

impl fmt::Debug for LocalFileCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalFileCacheConfig")
            .field("base_dir", &self.base_dir)
            .field("delete_expired", &self.delete_expired)
            .field("mirror_to_memory", &self.mirror_to_memory)
            .field("file_format", &self.file_format)
            .field("debug_tracing", &self.debug_tracing)
            .field("sweep_interval", &self.sweep_interval)
            .field("insert_timeout", &self.insert_timeout)
            .field("select_timeout", &self.select_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extensions_match_the_format() {
        assert_eq!(FileFormat::Text.extension(), ".txt");
        assert_eq!(FileFormat::Json.extension(), ".json");
        assert_eq!(FileFormat::Binary.extension(), ".bin");
    }

    #[test]
    fn defaults_keep_deletion_on_and_mirroring_off() {
        let config = LocalFileCacheConfig::new("/tmp/larder");
        assert!(config.delete_expired);
        assert!(!config.mirror_to_memory);
        assert_eq!(config.file_format, FileFormat::Text);
        assert_eq!(config.sweep_interval, Duration::from_millis(250));
    }
}
