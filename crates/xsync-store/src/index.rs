//! Precomputed search index
//!
//! Stores per-object name variants (basename, sanitized, snake-cased, and
//! path forms) so identifier resolution never re-normalizes every object
//! per query. One index type serves both roles from the redesign: loaded
//! from the persisted cache when available, or built on the fly from the
//! object store when not — the matching logic upstream is shared either
//! way.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use xsync_fs::names::{sanitize, sanitize_path, snake_case, snake_path};
use xsync_fs::{NormalizedPath, SOURCE_EXT, io};

use crate::store::ObjectStore;
use crate::{Error, Result};
use xsync_remote::ObjectType;

/// Precomputed name variants for one tracked object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchIndexEntry {
    pub path: String,
    pub name: String,
    #[serde(rename = "type")]
    pub object_type: ObjectType,
    pub basename: String,
    pub sanitized: String,
    pub snake: String,
    pub path_no_ext: String,
    pub sanitized_path: String,
    pub snake_path: String,
}

impl SearchIndexEntry {
    /// Compute all variants for a tracked path.
    pub fn from_parts(path: &str, object_type: ObjectType) -> Self {
        let normalized = NormalizedPath::new(path);
        let basename = normalized.file_stem().unwrap_or_default().to_string();
        let path_no_ext = match path.strip_suffix(&format!(".{SOURCE_EXT}")) {
            Some(stripped) => stripped.to_string(),
            None => path.to_string(),
        };
        Self {
            path: path.to_string(),
            name: basename.clone(),
            object_type,
            sanitized: sanitize(&basename),
            snake: snake_case(&basename),
            sanitized_path: sanitize_path(&path_no_ext),
            snake_path: snake_path(&path_no_ext),
            path_no_ext,
            basename,
        }
    }
}

/// A function reference target for in-source `function.run` resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionRef {
    pub name: String,
    pub path: String,
}

/// Search index with lookup maps keyed by basename, sanitized variants,
/// and path forms.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchIndex {
    objects: Vec<SearchIndexEntry>,
    #[serde(rename = "byBasename")]
    by_basename: BTreeMap<String, Vec<usize>>,
    #[serde(rename = "bySanitized")]
    by_sanitized: BTreeMap<String, Vec<usize>>,
    #[serde(rename = "byPath")]
    by_path: BTreeMap<String, usize>,
    tables: BTreeMap<String, String>,
    functions: Vec<FunctionRef>,
}

impl SearchIndex {
    /// Build an index from the object store.
    pub fn build(store: &ObjectStore) -> Self {
        let mut index = Self::default();
        for tracked in store.entries() {
            index.insert(SearchIndexEntry::from_parts(&tracked.path, tracked.object_type));
        }
        index
    }

    /// Load a persisted index file.
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        let content = io::read_text(path)?;
        serde_json::from_str(&content).map_err(|e| Error::Corrupt {
            path: path.to_native(),
            message: e.to_string(),
        })
    }

    /// Prefer the persisted cache; fall back to building from the store.
    ///
    /// A cache that fails to parse is ignored rather than fatal, since an
    /// equivalent index can always be rebuilt.
    pub fn load_or_build(path: &NormalizedPath, store: &ObjectStore) -> Self {
        if path.exists() {
            match Self::load(path) {
                Ok(index) => return index,
                Err(e) => debug!("ignoring unreadable search index: {e}"),
            }
        }
        Self::build(store)
    }

    /// Save the index atomically.
    pub fn save(&self, path: &NormalizedPath) -> Result<()> {
        let mut content = serde_json::to_string_pretty(self)?;
        content.push('\n');
        io::write_text(path, &content)?;
        Ok(())
    }

    fn insert(&mut self, entry: SearchIndexEntry) {
        let idx = self.objects.len();

        let basenames = self.by_basename.entry(entry.basename.clone()).or_default();
        if !basenames.contains(&idx) {
            basenames.push(idx);
        }
        for key in [&entry.sanitized, &entry.snake] {
            let slot = self.by_sanitized.entry(key.clone()).or_default();
            if !slot.contains(&idx) {
                slot.push(idx);
            }
        }
        self.by_path.insert(entry.path.clone(), idx);
        self.by_path.insert(entry.path_no_ext.clone(), idx);

        match entry.object_type {
            ObjectType::Table => {
                self.tables.insert(entry.basename.clone(), entry.path.clone());
                self.tables.insert(entry.snake.clone(), entry.path.clone());
            }
            ObjectType::Function => {
                self.functions.push(FunctionRef {
                    name: entry.basename.clone(),
                    path: entry.path.clone(),
                });
            }
            _ => {}
        }

        self.objects.push(entry);
    }

    /// All indexed objects in store order.
    pub fn entries(&self) -> &[SearchIndexEntry] {
        &self.objects
    }

    /// Objects whose basename equals `key` exactly.
    pub fn lookup_basename(&self, key: &str) -> Vec<&SearchIndexEntry> {
        self.resolve_indices(self.by_basename.get(key))
    }

    /// Objects whose sanitized or snake-cased basename equals `key`.
    pub fn lookup_sanitized(&self, key: &str) -> Vec<&SearchIndexEntry> {
        self.resolve_indices(self.by_sanitized.get(key))
    }

    /// Object at an exact path, with or without the source extension.
    pub fn lookup_path(&self, key: &str) -> Option<&SearchIndexEntry> {
        self.by_path.get(key).map(|&idx| &self.objects[idx])
    }

    /// Table path by exact or snake-cased table name.
    pub fn table_path(&self, name: &str) -> Option<&str> {
        self.tables
            .get(name)
            .or_else(|| self.tables.get(&snake_case(name)))
            .map(String::as_str)
    }

    /// All function reference targets.
    pub fn functions(&self) -> &[FunctionRef] {
        &self.functions
    }

    fn resolve_indices(&self, indices: Option<&Vec<usize>>) -> Vec<&SearchIndexEntry> {
        indices
            .map(|ids| ids.iter().map(|&i| &self.objects[i]).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::TrackedObject;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn store_with(entries: &[(u64, ObjectType, &str)]) -> ObjectStore {
        let mut store = ObjectStore::new();
        for &(id, object_type, path) in entries {
            store.upsert(TrackedObject::new(id, object_type, path, "src"));
        }
        store
    }

    #[test]
    fn entry_variants_are_precomputed() {
        let entry = SearchIndexEntry::from_parts("apis/auth/login_POST.xs", ObjectType::ApiEndpoint);
        assert_eq!(entry.basename, "login_POST");
        assert_eq!(entry.sanitized, "login_POST");
        assert_eq!(entry.snake, "login_post");
        assert_eq!(entry.path_no_ext, "apis/auth/login_POST");
        assert_eq!(entry.snake_path, "apis/auth/login_post");
    }

    #[test]
    fn lookup_path_accepts_both_forms() {
        let store = store_with(&[(5, ObjectType::Function, "functions/calc_total.xs")]);
        let index = SearchIndex::build(&store);

        assert!(index.lookup_path("functions/calc_total.xs").is_some());
        assert!(index.lookup_path("functions/calc_total").is_some());
        assert!(index.lookup_path("functions/other").is_none());
    }

    #[test]
    fn lookup_sanitized_covers_snake_variant() {
        let store = store_with(&[(1, ObjectType::Function, "functions/CalcTotal.xs")]);
        let index = SearchIndex::build(&store);

        assert_eq!(index.lookup_sanitized("calc_total").len(), 1);
        assert_eq!(index.lookup_sanitized("CalcTotal").len(), 1);
    }

    #[test]
    fn tables_map_keys_exact_and_snake_names() {
        let store = store_with(&[(2, ObjectType::Table, "tables/UserProfiles.xs")]);
        let index = SearchIndex::build(&store);

        assert_eq!(index.table_path("UserProfiles"), Some("tables/UserProfiles.xs"));
        assert_eq!(index.table_path("user_profiles"), Some("tables/UserProfiles.xs"));
        assert_eq!(index.table_path("missing"), None);
    }

    #[test]
    fn functions_are_collected_for_reference_resolution() {
        let store = store_with(&[
            (1, ObjectType::Function, "functions/calc_total.xs"),
            (2, ObjectType::Table, "tables/users.xs"),
        ]);
        let index = SearchIndex::build(&store);

        assert_eq!(index.functions().len(), 1);
        assert_eq!(index.functions()[0].name, "calc_total");
    }

    #[test]
    fn persisted_file_uses_documented_keys() {
        let store = store_with(&[(5, ObjectType::Function, "functions/calc_total.xs")]);
        let index = SearchIndex::build(&store);
        let value = serde_json::to_value(&index).unwrap();

        for key in ["objects", "byBasename", "bySanitized", "byPath", "tables", "functions"] {
            assert!(value.get(key).is_some(), "missing key {key}");
        }
    }

    #[test]
    fn load_or_build_prefers_persisted_cache() {
        let dir = tempdir().unwrap();
        let path = NormalizedPath::new(dir.path().join("index.json"));

        let persisted = SearchIndex::build(&store_with(&[(
            1,
            ObjectType::Function,
            "functions/from_cache.xs",
        )]));
        persisted.save(&path).unwrap();

        let other_store = store_with(&[(2, ObjectType::Function, "functions/from_store.xs")]);
        let index = SearchIndex::load_or_build(&path, &other_store);

        assert!(index.lookup_path("functions/from_cache.xs").is_some());
        assert!(index.lookup_path("functions/from_store.xs").is_none());
    }

    #[test]
    fn load_or_build_falls_back_when_cache_missing() {
        let dir = tempdir().unwrap();
        let path = NormalizedPath::new(dir.path().join("index.json"));
        let store = store_with(&[(2, ObjectType::Function, "functions/from_store.xs")]);

        let index = SearchIndex::load_or_build(&path, &store);

        assert!(index.lookup_path("functions/from_store.xs").is_some());
    }
}
