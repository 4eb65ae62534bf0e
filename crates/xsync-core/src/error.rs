//! Error types for xsync-core
//!
//! Only pre-batch conditions surface as hard errors from the engines.
//! Per-file failures inside a batch are collected into the report
//! structures in [`crate::report`] so one bad file never aborts its
//! siblings.

use std::path::PathBuf;

/// Result type for xsync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in xsync-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No `.xsync/config.toml` found here or in any ancestor directory
    #[error("not an xsync project (no .xsync/config.toml above {start})")]
    NotAProject { start: PathBuf },

    /// Refusing to initialize twice
    #[error("project already initialized at {root}")]
    AlreadyInitialized { root: PathBuf },

    /// No API token available
    #[error("missing API credentials: set XSYNC_TOKEN or add a token to {path}")]
    MissingCredentials { path: PathBuf },

    /// An endpoint file has no tracked api_group sibling in its directory
    #[error("no API group tracked alongside {path}")]
    MissingApiGroup { path: String },

    /// A fetched endpoint carries no owning group, or the group is unknown
    #[error("endpoint {name} has no resolvable owning API group")]
    EndpointWithoutGroup { name: String },

    /// Leading-keyword sniffing failed for an untracked file
    #[error("cannot determine object type of {path}")]
    UnknownObjectType { path: String },

    /// A pull target has no store entry
    #[error("{path} is not tracked")]
    UntrackedPath { path: String },

    /// Delete-then-recreate recovery deleted the remote object but the
    /// recreate was rejected; the delete is not rolled back
    #[error("deleted remote object but failed to recreate {path}: {message}")]
    RecreateFailed { path: String, message: String },

    /// Filesystem error from xsync-fs
    #[error(transparent)]
    Fs(#[from] xsync_fs::Error),

    /// Store error from xsync-store
    #[error(transparent)]
    Store(#[from] xsync_store::Error),

    /// Remote API error from xsync-remote
    #[error(transparent)]
    Remote(#[from] xsync_remote::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// TOML deserialization error
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),
}
