//! Engine configuration.

use crate::decider::TimestampPassedDecider;
use larder_core::{CacheEntry, Decorator, ExpirationDecider};
use larder_decorators::{TimeoutDecorator, TracingDecorator};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Tuning knobs for [`MemoryCache`](crate::MemoryCache).
///
/// The decorator lists default to a timeout plus tracing chain built from
/// the budget fields; callers that set a list explicitly take full control
/// of that path (an empty list disables decoration).
#[derive(Clone)]
pub struct MemoryCacheConfig {
    /// Pace of the background sweeper. Zero disables it, which keeps
    /// expiry handling purely lazy (useful in tests).
    pub sweep_interval: Duration,
    /// Budget for one insert, enforced by the default decorator chain.
    pub insert_timeout: Duration,
    /// Budget for one select, enforced by the default decorator chain.
    pub select_timeout: Duration,
    /// Forces the tracing decorator on even when DEBUG logging is off.
    pub debug_tracing: bool,
    /// Policy consulted by the sweeper before it removes a bucket.
    pub decider: Arc<dyn ExpirationDecider>,
    pub insert_decorators: Option<Vec<Arc<dyn Decorator<()>>>>,
    pub select_decorators: Option<Vec<Arc<dyn Decorator<Option<CacheEntry>>>>>,
}

impl Default for MemoryCacheConfig {
    fn default() -> Self {
        Self {
            sweep_interval: Duration::from_millis(100),
            insert_timeout: Duration::from_millis(400),
            select_timeout: Duration::from_millis(1500),
            debug_tracing: false,
            decider: Arc::new(TimestampPassedDecider),
            insert_decorators: None,
            select_decorators: None,
        }
    }
}

impl MemoryCacheConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
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
    pub fn with_debug_tracing(mut self, enabled: bool) -> Self {
        self.debug_tracing = enabled;
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

impl fmt::Debug for MemoryCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryCacheConfig")
            .field("sweep_interval", &self.sweep_interval)
            .field("insert_timeout", &self.insert_timeout)
            .field("select_timeout", &self.select_timeout)
            .field("debug_tracing", &self.debug_tracing)
            .field(
                "insert_decorators",
                &self.insert_decorators.as_ref().map(Vec::len),
            )
            .field(
                "select_decorators",
                &self.select_decorators.as_ref().map(Vec::len),
            )
            .finish()
    }
}
