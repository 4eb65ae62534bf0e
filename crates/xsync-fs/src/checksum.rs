//! SHA-256 content checksums
//!
//! Baseline hashes are the only change-detection mechanism in xsync: a
//! tracked file has drifted exactly when its live digest differs from the
//! digest recorded at the last successful sync. Digests are lowercase hex
//! with no prefix, matching the `sha256` field of the object store.

use sha2::{Digest, Sha256};
use std::path::Path;

/// Compute the SHA-256 digest of string content as lowercase hex.
pub fn content_sha256(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Compute the SHA-256 digest of a file's contents as lowercase hex.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn file_sha256(path: &Path) -> std::io::Result<String> {
    let content = std::fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&content);
    Ok(format!("{:x}", hasher.finalize()))
}
