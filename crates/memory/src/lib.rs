//! Expiring in-memory cache engine.
//!
//! [`MemoryCache`] keeps entries in a concurrent store and tracks their
//! expiry instants in a bucketed index; a background sweeper removes whole
//! buckets once their timestamp passes. Reads apply the liveness check
//! themselves, so expired entries are invisible even before the sweeper
//! gets to them.

pub mod cache;
pub mod config;
pub mod decider;
pub mod stats;

mod sweep;

#[cfg(test)]
mod tests;

pub use cache::MemoryCache;
pub use config::MemoryCacheConfig;
pub use decider::TimestampPassedDecider;
pub use stats::StatsSnapshot;
