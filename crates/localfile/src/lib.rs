//! Durable file-backed cache tier.
//!
//! [`LocalFileCache`] implements the same capability as the in-memory
//! engine, backed by two directories under one base: `cache/` holds the
//! encoded entries, `expirations/` holds one folder of expiry markers per
//! expiry instant. A wrapped [`larder_memory::MemoryCache`] serves as the
//! fast path, and a background worker deletes expired files the same way
//! the engine's sweeper evicts expired buckets.

pub mod cache;
pub mod codec;
pub mod config;

mod locks;
mod paths;
mod sweep;

#[cfg(test)]
mod tests;

pub use cache::LocalFileCache;
pub use codec::{BincodeCodec, EntryCodec, JsonCodec};
pub use config::{FileFormat, LocalFileCacheConfig};
