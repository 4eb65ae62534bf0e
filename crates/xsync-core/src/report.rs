//! Batch operation reports
//!
//! Per-file failures are collected, not thrown: a single bad file never
//! aborts its siblings, and the CLI renders an aggregate summary at the
//! end of the batch.

use serde::Serialize;

/// A failure scoped to one file within a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileError {
    pub path: String,
    pub message: String,
}

impl FileError {
    pub fn new(path: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

/// Result of a push batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PushReport {
    /// Paths successfully created or updated remotely
    pub pushed: Vec<String>,
    /// Tracked paths whose file no longer exists, left intact
    pub orphans: Vec<String>,
    /// Orphans whose remote object was deleted (`--clean`)
    pub deleted_orphans: Vec<String>,
    pub errors: Vec<FileError>,
}

impl PushReport {
    pub fn pushed_count(&self) -> usize {
        self.pushed.len()
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Result of a pull batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PullReport {
    /// Paths refreshed from the remote
    pub pulled: Vec<String>,
    /// Paths skipped to protect unsynced local edits
    pub skipped: Vec<String>,
    /// Local files deleted because the remote no longer has them (`--clean`)
    pub deleted: Vec<String>,
    pub errors: Vec<FileError>,
}

impl PullReport {
    pub fn pulled_count(&self) -> usize {
        self.pulled.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}
