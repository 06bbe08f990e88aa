//! Core domain types, errors, and seams for the larder cache family.
//!
//! This crate establishes the building blocks every cache tier shares: the
//! entry model, the closed error set, the capability trait, and the hook
//! traits implementations plug their policies into.
//!
//! ## Key Components
//!
//! - **`errors`**: Defines the `CacheError` enum and `CacheResult` alias,
//!   centralizing every failure mode a cache operation can surface.
//! - **`entry`**: The `CacheEntry` / `CacheEntryKey` value types stored by
//!   all tiers.
//! - **`capability`**: The object-safe `Cache` trait implemented by each
//!   tier and consumed through `Arc<dyn Cache>`.
//! - **`decorator`**: The composition seam for cross-cutting behavior such
//!   as timeouts and tracing.
//! - **`registry`**: Explicitly constructed holders that hand shared cache
//!   instances to the rest of a process.

pub mod capability;
pub mod decider;
pub mod decorator;
pub mod entry;
pub mod errors;
pub mod registry;

pub use self::{
    capability::Cache,
    decider::ExpirationDecider,
    decorator::{decorate_all, Decorator, OperationContext},
    entry::{CacheEntry, CacheEntryKey},
    errors::{CacheError, CacheResult, ResultExt},
    registry::{CacheRegistry, SingleCache},
};
