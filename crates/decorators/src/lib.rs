//! Cross-cutting decorators for cache operations.
//!
//! Both decorators implement [`larder_core::Decorator`] for every result
//! type, so one instance can sit on an insert chain and a select chain
//! alike.

pub mod timeout;
pub mod traced;

pub use timeout::TimeoutDecorator;
pub use traced::TracingDecorator;
