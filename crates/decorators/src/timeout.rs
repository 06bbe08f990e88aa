//! Budget enforcement for cache operations.

use async_trait::async_trait;
use futures::future::BoxFuture;
use larder_core::{CacheError, CacheResult, Decorator, OperationContext};
use std::time::Duration;

/// Fails the wrapped operation once it runs past the configured budget.
///
/// On overrun the inner future is dropped, which cancels it along with
/// everything it was awaiting, and the chain yields
/// [`CacheError::TimeoutExceeded`] naming the operation.
#[derive(Debug, Clone, Copy)]
pub struct TimeoutDecorator {
    budget: Duration,
}

impl TimeoutDecorator {
    #[must_use]
    pub fn new(budget: Duration) -> Self {
        Self { budget }
    }

    #[must_use]
    pub fn budget(&self) -> Duration {
        self.budget
    }
}

#[async_trait]
impl<T: Send + 'static> Decorator<T> for TimeoutDecorator {
    async fn decorate(
        &self,
        ctx: &OperationContext,
        op: BoxFuture<'_, CacheResult<T>>,
    ) -> CacheResult<T> {
        match tokio::time::timeout(self.budget, op).await {
            Ok(result) => result,
            Err(_) => Err(CacheError::timeout_exceeded(ctx.name(), self.budget)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn overrun_fails_with_the_operation_name() {
        let decorator = TimeoutDecorator::new(Duration::from_millis(50));
        let ctx = OperationContext::new("insert", "k1");

        let result: CacheResult<u32> = decorator
            .decorate(
                &ctx,
                Box::pin(async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    Ok(1)
                }),
            )
            .await;

        match result {
            Err(CacheError::TimeoutExceeded { operation, budget }) => {
                assert_eq!(operation, "insert");
                assert_eq!(budget, Duration::from_millis(50));
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fast_operations_pass_through_untouched() {
        let decorator = TimeoutDecorator::new(Duration::from_millis(50));
        let ctx = OperationContext::new("select", "k1");

        let result: CacheResult<&str> = decorator
            .decorate(&ctx, Box::pin(async { Ok("value") }))
            .await;
        assert_eq!(result.unwrap(), "value");
    }

    #[tokio::test(start_paused = true)]
    async fn inner_errors_survive_the_wrapper() {
        let decorator = TimeoutDecorator::new(Duration::from_millis(50));
        let ctx = OperationContext::new("select", "k1");

        let result: CacheResult<u32> = decorator
            .decorate(
                &ctx,
                Box::pin(async { Err(CacheError::unknown("inner failure")) }),
            )
            .await;
        assert!(matches!(result, Err(CacheError::Unknown { .. })));
    }
}
