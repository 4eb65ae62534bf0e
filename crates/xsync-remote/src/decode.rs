//! XanoScript source extraction
//!
//! Collection payloads carry the source either as a plain JSON string or
//! wrapped in a `{status, value}` object. Objects with no extractable
//! source are skipped at fetch time rather than materialized as empty
//! files.

use serde_json::Value;
use tracing::debug;

use crate::types::{FetchedObject, ObjectType, RawObject};

/// Extract the XanoScript source from a payload value.
///
/// Accepts a plain string or a `{status, value}` wrapper whose `value` is
/// a string. Anything else yields `None`.
pub fn extract_source(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => match map.get("value") {
            Some(Value::String(s)) => Some(s.clone()),
            _ => None,
        },
        _ => None,
    }
}

impl RawObject {
    /// Decode into a [`FetchedObject`], or `None` when the payload has no
    /// extractable source.
    pub fn into_fetched(self, object_type: ObjectType) -> Option<FetchedObject> {
        let content = match self.xanoscript.as_ref().and_then(extract_source) {
            Some(content) => content,
            None => {
                debug!(id = self.id, %object_type, "skipping object with no source");
                return None;
            }
        };
        Some(FetchedObject {
            id: self.id,
            object_type,
            name: self.name,
            content,
            group_id: self.apigroup_id,
            verb: self.verb,
            path_shape: self.path,
            canonical: self.canonical,
        })
    }
}
