//! Error types and result extensions for cache operations

mod builders;
mod conversions;
mod display;
mod extensions;
mod types;

pub use extensions::*;
pub use types::{CacheError, CacheResult};
