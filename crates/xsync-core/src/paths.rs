//! Deterministic path generation
//!
//! Maps a fetched object to its canonical relative file path. The mapping
//! must be a pure function of (object, configuration) so repeated syncs
//! never silently relocate unchanged files. User-supplied hooks may
//! override the resolved path or the name sanitizer; a `None` return
//! defers to the default rule.

use xsync_fs::names::{sanitize, strip_placeholders};
use xsync_fs::{NormalizedPath, SOURCE_EXT};
use xsync_remote::{FetchedObject, ObjectType};
use xsync_store::GroupCache;

use crate::config::{NamingMode, PathConfig};
use crate::{Error, Result};

/// Strategy hook overriding the generated path for individual objects.
///
/// Checked before the default rules; returning `None` defers.
pub trait PathResolverHook: Send + Sync {
    fn resolve(&self, object: &FetchedObject, default_dir: &str) -> Option<String>;
}

/// Strategy hook overriding the default name sanitizer.
///
/// Returning `None` defers to non-alphanumeric-to-underscore.
pub trait NameSanitizerHook: Send + Sync {
    fn sanitize(&self, raw: &str) -> Option<String>;
}

/// Generates canonical relative paths for fetched objects.
pub struct PathGenerator<'a> {
    config: &'a PathConfig,
    naming: NamingMode,
    resolver_hook: Option<&'a dyn PathResolverHook>,
    sanitizer_hook: Option<&'a dyn NameSanitizerHook>,
}

impl<'a> PathGenerator<'a> {
    pub fn new(config: &'a PathConfig, naming: NamingMode) -> Self {
        Self {
            config,
            naming,
            resolver_hook: None,
            sanitizer_hook: None,
        }
    }

    pub fn with_resolver_hook(mut self, hook: &'a dyn PathResolverHook) -> Self {
        self.resolver_hook = Some(hook);
        self
    }

    pub fn with_sanitizer_hook(mut self, hook: &'a dyn NameSanitizerHook) -> Self {
        self.sanitizer_hook = Some(hook);
        self
    }

    /// Generate the relative path for `object`.
    ///
    /// API endpoints embed their owning group's display name, resolved
    /// through `groups`; an endpoint without a resolvable group is an
    /// error.
    pub fn generate(&self, object: &FetchedObject, groups: &GroupCache) -> Result<String> {
        let dir = self.config.dir_for(object.object_type);

        if let Some(hook) = self.resolver_hook
            && let Some(path) = hook.resolve(object, dir)
        {
            return Ok(NormalizedPath::new(path).as_str().to_string());
        }

        let file = match object.object_type {
            ObjectType::ApiEndpoint => {
                let group_name = object
                    .group_id
                    .and_then(|id| groups.name_of(id))
                    .ok_or_else(|| Error::EndpointWithoutGroup {
                        name: object.name.clone(),
                    })?;
                let signature = self.endpoint_signature(object);
                format!("{}/{}/{}", dir, self.sanitize_name(group_name), signature)
            }
            ObjectType::ApiGroup => {
                format!("{}/{}/group", dir, self.sanitize_name(&object.name))
            }
            ObjectType::TableTrigger => {
                format!("{}/triggers/{}", dir, self.sanitize_name(&object.name))
            }
            // function, table, task, and every extended type share the
            // generic {typeDir}/{sanitizedName} rule
            _ => format!("{}/{}", dir, self.sanitize_name(&object.name)),
        };

        let file = match self.naming {
            NamingMode::Clean => file,
            NamingMode::Legacy => prefix_id(&file, object.id),
        };

        Ok(format!("{file}.{SOURCE_EXT}"))
    }

    /// `{sanitized path segments joined by _}_{VERB}`, placeholder braces
    /// stripped. An endpoint at the group root collapses to the verb.
    fn endpoint_signature(&self, object: &FetchedObject) -> String {
        let verb = object
            .verb
            .as_deref()
            .unwrap_or("GET")
            .to_ascii_uppercase();
        let shape = object.path_shape.as_deref().unwrap_or("");
        let segments: Vec<String> = shape
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| self.sanitize_name(&strip_placeholders(s)))
            .collect();
        if segments.is_empty() {
            verb
        } else {
            format!("{}_{}", segments.join("_"), verb)
        }
    }

    fn sanitize_name(&self, raw: &str) -> String {
        if let Some(hook) = self.sanitizer_hook
            && let Some(overridden) = hook.sanitize(raw)
        {
            return overridden;
        }
        sanitize(raw)
    }
}

/// Prefix the remote id onto the final path component.
fn prefix_id(path: &str, id: u64) -> String {
    match path.rfind('/') {
        Some(idx) => format!("{}/{}_{}", &path[..idx], id, &path[idx + 1..]),
        None => format!("{id}_{path}"),
    }
}
