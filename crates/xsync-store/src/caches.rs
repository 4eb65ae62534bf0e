//! Group and endpoint metadata caches
//!
//! Lightweight maps from API-group display name and endpoint signature to
//! the remote's canonical identifier, persisted so live API calls can be
//! resolved without re-fetching group metadata.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use xsync_fs::{NormalizedPath, io};
use crate::{Error, Result};

/// Canonical remote reference: numeric id plus stable external identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalRef {
    pub id: u64,
    pub canonical: String,
}

/// Map from API-group display name to its canonical reference.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupCache {
    groups: BTreeMap<String, CanonicalRef>,
}

impl GroupCache {
    pub fn insert(&mut self, name: impl Into<String>, id: u64, canonical: impl Into<String>) {
        self.groups.insert(
            name.into(),
            CanonicalRef {
                id,
                canonical: canonical.into(),
            },
        );
    }

    pub fn get(&self, name: &str) -> Option<&CanonicalRef> {
        self.groups.get(name)
    }

    /// Reverse lookup: display name of a group id.
    pub fn name_of(&self, id: u64) -> Option<&str> {
        self.groups
            .iter()
            .find(|(_, r)| r.id == id)
            .map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn load_or_default(path: &NormalizedPath) -> Result<Self> {
        load_cache(path)
    }

    pub fn save(&self, path: &NormalizedPath) -> Result<()> {
        save_cache(self, path)
    }
}

/// Map from endpoint signature (`"{VERB} {path}"`) to its canonical
/// reference.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EndpointCache {
    endpoints: BTreeMap<String, CanonicalRef>,
}

impl EndpointCache {
    /// Signature key for a verb + path-shape pair.
    pub fn signature(verb: &str, path: &str) -> String {
        format!("{} {}", verb.to_ascii_uppercase(), path)
    }

    pub fn insert(&mut self, verb: &str, path: &str, id: u64, canonical: impl Into<String>) {
        self.endpoints.insert(
            Self::signature(verb, path),
            CanonicalRef {
                id,
                canonical: canonical.into(),
            },
        );
    }

    pub fn get(&self, verb: &str, path: &str) -> Option<&CanonicalRef> {
        self.endpoints.get(&Self::signature(verb, path))
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    pub fn load_or_default(path: &NormalizedPath) -> Result<Self> {
        load_cache(path)
    }

    pub fn save(&self, path: &NormalizedPath) -> Result<()> {
        save_cache(self, path)
    }
}

fn load_cache<T: Default + for<'de> Deserialize<'de>>(path: &NormalizedPath) -> Result<T> {
    if !path.exists() {
        return Ok(T::default());
    }
    let content = io::read_text(path)?;
    serde_json::from_str(&content).map_err(|e| Error::Corrupt {
        path: path.to_native(),
        message: e.to_string(),
    })
}

fn save_cache<T: Serialize>(cache: &T, path: &NormalizedPath) -> Result<()> {
    let mut content = serde_json::to_string_pretty(cache)?;
    content.push('\n');
    io::write_text(path, &content)?;
    Ok(())
}
