//! On-disk layout of the file tier.
//!
//! ```text
//! <base>/cache/<key><ext>                      encoded entry
//! <base>/expirations/<timestamp>/<key><ext>    expiry marker
//! ```
//!
//! The per-timestamp folder name is the expiry instant in RFC 3339 with
//! every `:` replaced by `_` so it can live in a path on any platform.

use chrono::{DateTime, Utc};
use larder_core::{CacheEntryKey, CacheError, CacheResult};
use std::path::{Path, PathBuf};

pub(crate) const CACHE_DIR: &str = "cache";
pub(crate) const EXPIRATIONS_DIR: &str = "expirations";

/// Path of the encoded entry file for `key`.
pub(crate) fn entry_path(cache_dir: &Path, key: &CacheEntryKey, ext: &str) -> PathBuf {
    cache_dir.join(format!("{key}{ext}"))
}

/// Path of the expiry marker file for `key`, inside its timestamp folder.
pub(crate) fn marker_path(
    expirations_dir: &Path,
    expires_at: DateTime<Utc>,
    key: &CacheEntryKey,
    ext: &str,
) -> PathBuf {
    expirations_dir
        .join(encode_timestamp_dirname(expires_at))
        .join(format!("{key}{ext}"))
}

/// Folder name for an expiry instant.
pub(crate) fn encode_timestamp_dirname(expires_at: DateTime<Utc>) -> String {
    expires_at.to_rfc3339().replace(':', "_")
}

/// Inverse of [`encode_timestamp_dirname`]. `None` for folders that were
/// not produced by it.
pub(crate) fn parse_timestamp_dirname(name: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&name.replace('_', ":"))
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}

/// Rejects keys that cannot safely name a file inside the cache folder.
pub(crate) fn validate_key(key: &CacheEntryKey) -> CacheResult<()> {
    let id = key.as_str();
    let unusable = id.is_empty()
        || id == "."
        || id == ".."
        || id.contains(['/', '\\', '\0'])
        || id.contains(std::path::MAIN_SEPARATOR);
    if unusable {
        return Err(CacheError::unknown(format!(
            "cache key '{id}' cannot be used as a file name"
        )));
    }
    Ok(())
}
