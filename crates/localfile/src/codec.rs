//! Entry encode/decode seam.

use larder_core::{CacheEntry, CacheError, CacheResult};

/// Turns entries into file contents and back.
///
/// The tier never interprets the bytes itself, so callers can swap in any
/// codec whose output round-trips.
pub trait EntryCodec: Send + Sync {
    fn encode(&self, entry: &CacheEntry) -> CacheResult<Vec<u8>>;
    fn decode(&self, bytes: &[u8]) -> CacheResult<CacheEntry>;
}

/// Default codec for the text and JSON formats.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl EntryCodec for JsonCodec {
    fn encode(&self, entry: &CacheEntry) -> CacheResult<Vec<u8>> {
        Ok(serde_json::to_vec(entry)?)
    }

    fn decode(&self, bytes: &[u8]) -> CacheResult<CacheEntry> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Codec for the binary format.
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeCodec;

impl EntryCodec for BincodeCodec {
    fn encode(&self, entry: &CacheEntry) -> CacheResult<Vec<u8>> {
        bincode::serialize(entry)
            .map_err(|e| CacheError::unknown_with_source("binary encoding failed", e))
    }

    fn decode(&self, bytes: &[u8]) -> CacheResult<CacheEntry> {
        bincode::deserialize(bytes)
            .map_err(|e| CacheError::unknown_with_source("binary decoding failed", e))
    }
}
