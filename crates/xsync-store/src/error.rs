//! Error types for xsync-store

use std::path::PathBuf;

/// Result type for xsync-store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in xsync-store operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// State file exists but cannot be parsed
    #[error("corrupt state file {path}: {message}")]
    Corrupt { path: PathBuf, message: String },

    /// Filesystem error from xsync-fs
    #[error(transparent)]
    Fs(#[from] xsync_fs::Error),

    /// JSON serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
