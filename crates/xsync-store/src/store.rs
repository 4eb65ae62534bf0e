//! Tracked-object store
//!
//! One record per locally materialized remote object, persisted as an
//! ordered JSON array keyed by path. The baseline `sha256` is updated only
//! by a successful push or pull, never by merely observing a change; every
//! engine recomputes live state from file hashes instead of trusting the
//! persisted `status`.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

use xsync_fs::checksum::content_sha256;
use xsync_fs::{NormalizedPath, io};
use xsync_remote::ObjectType;

use crate::{Error, Result};

/// Last-computed classification of a tracked file. Informational only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    #[default]
    Synced,
    Modified,
    Missing,
}

/// A remote object with a local file mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedObject {
    /// Remote numeric identity
    pub id: u64,
    /// Object kind; `(type, id)` uniquely identifies a remote object
    #[serde(rename = "type")]
    pub object_type: ObjectType,
    /// Canonical relative file path, unique within the store
    pub path: String,
    /// Hex SHA-256 of the content as of the last successful sync
    pub sha256: String,
    /// Base64 copy of that same synced content, for conflict diagnostics
    pub original: String,
    /// Last-computed classification, recomputed on every status pass
    #[serde(default)]
    pub status: SyncStatus,
}

impl TrackedObject {
    /// Create a tracked object whose baseline is `content`.
    pub fn new(id: u64, object_type: ObjectType, path: impl Into<String>, content: &str) -> Self {
        Self {
            id,
            object_type,
            path: path.into(),
            sha256: content_sha256(content),
            original: BASE64.encode(content.as_bytes()),
            status: SyncStatus::Synced,
        }
    }

    /// Record a new synced baseline after a successful push or pull.
    pub fn record_synced_content(&mut self, content: &str) {
        self.sha256 = content_sha256(content);
        self.original = BASE64.encode(content.as_bytes());
        self.status = SyncStatus::Synced;
    }

    /// Decode the baseline snapshot, if it is valid base64 UTF-8.
    pub fn snapshot(&self) -> Option<String> {
        let bytes = BASE64.decode(&self.original).ok()?;
        String::from_utf8(bytes).ok()
    }
}

/// Ordered collection of tracked objects with path-keyed upsert.
#[derive(Debug, Clone, Default)]
pub struct ObjectStore {
    entries: Vec<TrackedObject>,
}

impl ObjectStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the store from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid
    /// tracked-object array.
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        let content = io::read_text(path)?;
        let entries: Vec<TrackedObject> =
            serde_json::from_str(&content).map_err(|e| Error::Corrupt {
                path: path.to_native(),
                message: e.to_string(),
            })?;
        Ok(Self { entries })
    }

    /// Load the store, treating a missing file as empty.
    pub fn load_or_default(path: &NormalizedPath) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::new())
        }
    }

    /// Save the store atomically as a newline-terminated JSON array.
    pub fn save(&self, path: &NormalizedPath) -> Result<()> {
        let mut content = serde_json::to_string_pretty(&self.entries)?;
        content.push('\n');
        io::write_text(path, &content)?;
        Ok(())
    }

    /// All tracked objects in stored order.
    pub fn entries(&self) -> &[TrackedObject] {
        &self.entries
    }

    /// Replace the entry for `entry.path`, or append a new one.
    ///
    /// Callers must supply the full identity and hash for the new state;
    /// partial hash state is never merged silently.
    pub fn upsert(&mut self, entry: TrackedObject) {
        match self.entries.iter().position(|e| e.path == entry.path) {
            Some(pos) => self.entries[pos] = entry,
            None => self.entries.push(entry),
        }
    }

    /// Find a tracked object by exact path.
    pub fn find_by_path(&self, path: &str) -> Option<&TrackedObject> {
        self.entries.iter().find(|e| e.path == path)
    }

    /// Find a tracked object by remote identity.
    pub fn find_by_identity(&self, object_type: ObjectType, id: u64) -> Option<&TrackedObject> {
        self.entries
            .iter()
            .find(|e| e.object_type == object_type && e.id == id)
    }

    /// All tracked objects of one type, in stored order.
    pub fn entries_of_type(&self, object_type: ObjectType) -> impl Iterator<Item = &TrackedObject> {
        self.entries.iter().filter(move |e| e.object_type == object_type)
    }

    /// Remove the entry for a path, returning it if present.
    pub fn remove(&mut self, path: &str) -> Option<TrackedObject> {
        let pos = self.entries.iter().position(|e| e.path == path)?;
        Some(self.entries.remove(pos))
    }

    /// Update the informational status of a path in place.
    pub fn set_status(&mut self, path: &str, status: SyncStatus) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.path == path) {
            entry.status = status;
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
