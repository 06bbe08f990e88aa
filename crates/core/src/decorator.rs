//! Composition seam for cross-cutting operation behavior.
//!
//! A [`Decorator`] wraps one cache operation with behavior that runs before
//! and after it (budget enforcement, tracing, …) without the operation
//! knowing. Chains compose outside-in: the first decorator in a list is the
//! outermost wrapper, so its "before" runs first and its "after" runs last.

use crate::errors::CacheResult;
use async_trait::async_trait;
use futures::future::BoxFuture;
use std::sync::Arc;

/// Identifies the operation a decorator chain is wrapping.
#[derive(Debug, Clone)]
pub struct OperationContext {
    name: &'static str,
    subject: String,
}

impl OperationContext {
    #[must_use]
    pub fn new(name: &'static str, subject: impl Into<String>) -> Self {
        Self {
            name,
            subject: subject.into(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }
}

/// A cross-cutting wrapper around one cache operation.
///
/// Generic over the operation's result type so a single implementation can
/// wrap inserts and selects alike. Decorators must forward the inner result
/// (or replace it with a typed error) rather than swallow it.
#[async_trait]
pub trait Decorator<T>: Send + Sync {
    async fn decorate(
        &self,
        ctx: &OperationContext,
        op: BoxFuture<'_, CacheResult<T>>,
    ) -> CacheResult<T>;
}

/// Runs `op` wrapped in `decorators`, first decorator outermost.
pub fn decorate_all<'a, T>(
    decorators: &'a [Arc<dyn Decorator<T>>],
    ctx: &'a OperationContext,
    op: BoxFuture<'a, CacheResult<T>>,
) -> BoxFuture<'a, CacheResult<T>>
where
    T: Send + 'a,
{
    match decorators.split_first() {
        None => op,
        Some((outer, rest)) => {
            let inner = decorate_all(rest, ctx, op);
            Box::pin(async move { outer.decorate(ctx, inner).await })
        }
    }
}
