//! Before/after tracing for cache operations.

use async_trait::async_trait;
use futures::future::BoxFuture;
use larder_core::{CacheResult, Decorator, OperationContext};
use std::time::Instant;
use tracing::{debug, enabled, Level};

/// Emits one debug line before and one after the wrapped operation.
///
/// Active when enabled explicitly or when the `DEBUG` level is live for
/// this target; otherwise the operation runs untouched, without even a
/// clock read.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDecorator {
    enabled: bool,
}

impl TracingDecorator {
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

#[async_trait]
impl<T: Send + 'static> Decorator<T> for TracingDecorator {
    async fn decorate(
        &self,
        ctx: &OperationContext,
        op: BoxFuture<'_, CacheResult<T>>,
    ) -> CacheResult<T> {
        if !self.enabled && !enabled!(Level::DEBUG) {
            return op.await;
        }

        debug!(
            operation = ctx.name(),
            subject = ctx.subject(),
            "handling"
        );
        let started = Instant::now();
        let result = op.await;
        debug!(
            operation = ctx.name(),
            subject = ctx.subject(),
            elapsed = ?started.elapsed(),
            ok = result.is_ok(),
            "handled"
        );
        result
    }
}
