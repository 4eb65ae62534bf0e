//! Project context and configuration
//!
//! The engines never read ambient global state: a `ProjectContext` is
//! constructed once per command invocation by walking up from the working
//! directory to the project root, and threaded through every operation
//! call.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use xsync_fs::{NormalizedPath, StatePath, io};
use xsync_remote::ObjectType;
use xsync_store::ObjectStore;

use crate::{Error, Result};

/// File naming scheme for generated paths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamingMode {
    /// `functions/calc_total.xs`
    #[default]
    Clean,
    /// `functions/5_calc_total.xs` (remote id prefixed)
    Legacy,
}

fn default_api_url() -> String {
    "https://app.example.dev/api:meta".to_string()
}

/// `[remote]` section of the manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteSection {
    /// Base URL of the workspace metadata API
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

impl Default for RemoteSection {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
        }
    }
}

/// `[sync]` section of the manifest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncSection {
    #[serde(default)]
    pub naming: NamingMode,
}

/// Project manifest parsed from `.xsync/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub remote: RemoteSection,

    #[serde(default)]
    pub sync: SyncSection,

    /// Type-directory overrides keyed by object type name, e.g.
    /// `function = "fn"`. Unlisted types use their defaults.
    #[serde(default)]
    pub dirs: BTreeMap<String, String>,
}

impl Manifest {
    /// Parse a manifest from TOML content.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Template written by `xsync init`.
    pub fn template(api_url: &str) -> String {
        format!(
            "[remote]\napi_url = \"{api_url}\"\n\n[sync]\nnaming = \"clean\"\n"
        )
    }
}

/// Resolved type-directory mapping.
#[derive(Debug, Clone, Default)]
pub struct PathConfig {
    overrides: BTreeMap<String, String>,
}

impl PathConfig {
    pub fn from_manifest(manifest: &Manifest) -> Self {
        Self {
            overrides: manifest.dirs.clone(),
        }
    }

    /// Directory for an object type, honoring manifest overrides.
    pub fn dir_for(&self, object_type: ObjectType) -> &str {
        self.overrides
            .get(object_type.as_str())
            .map(String::as_str)
            .unwrap_or_else(|| object_type.directory())
    }

    /// All distinct type directories, used for untracked-file discovery.
    pub fn type_directories(&self) -> Vec<String> {
        let mut dirs: Vec<String> = ObjectType::ALL
            .iter()
            .map(|t| self.dir_for(*t).to_string())
            .collect();
        dirs.sort();
        dirs.dedup();
        dirs
    }
}

/// API credentials resolved from the environment or the user config file.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub token: String,
}

/// Per-credentials-file shape: `[auth] token = "..."`.
#[derive(Debug, Default, Deserialize)]
struct CredentialsFile {
    #[serde(default)]
    auth: AuthSection,
}

#[derive(Debug, Default, Deserialize)]
struct AuthSection {
    #[serde(default)]
    token: String,
}

/// A discovered project root plus its parsed manifest.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    pub root: NormalizedPath,
    pub manifest: Manifest,
}

impl ProjectContext {
    /// Open a project whose root is already known.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAProject`] if the root has no manifest.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = NormalizedPath::new(root.as_ref());
        let config = root.join(StatePath::Config.as_str());
        if !config.is_file() {
            return Err(Error::NotAProject {
                start: root.to_native(),
            });
        }
        let manifest = Manifest::parse(&io::read_text(&config)?)?;
        Ok(Self { root, manifest })
    }

    /// Discover the project root by walking up from `start`.
    pub fn discover(start: &Path) -> Result<Self> {
        let start_normalized = NormalizedPath::new(start);
        let origin = start_normalized
            .canonicalize()
            .unwrap_or(start_normalized);
        let mut current = Some(origin.clone());
        while let Some(dir) = current {
            if dir.join(StatePath::Config.as_str()).is_file() {
                return Self::open(dir.to_native());
            }
            current = dir.parent();
        }
        Err(Error::NotAProject {
            start: origin.to_native(),
        })
    }

    /// Scaffold a new project at `root`: manifest plus empty object store.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyInitialized`] if a manifest already exists.
    pub fn init(root: impl AsRef<Path>, api_url: &str) -> Result<Self> {
        let root = NormalizedPath::new(root.as_ref());
        let config = root.join(StatePath::Config.as_str());
        if config.exists() {
            return Err(Error::AlreadyInitialized {
                root: root.to_native(),
            });
        }
        io::write_text(&config, &Manifest::template(api_url))?;
        let store = ObjectStore::new();
        store.save(&root.join(StatePath::Objects.as_str()))?;
        Self::open(root.to_native())
    }

    /// Absolute path of a state file under `.xsync/`.
    pub fn state_file(&self, state: StatePath) -> NormalizedPath {
        self.root.join(state.as_str())
    }

    /// Absolute path of a project-relative tracked path.
    pub fn absolute(&self, relative: &str) -> NormalizedPath {
        self.root.join(relative)
    }

    /// Express a path (relative to CWD or absolute) as project-relative.
    pub fn relativize(&self, target: &Path) -> String {
        let normalized = NormalizedPath::new(target);
        let absolute = if target.is_absolute() {
            normalized.clone()
        } else {
            self.root.join(normalized.as_str())
        };
        match absolute.strip_prefix(&self.root) {
            Some(rel) => rel.as_str().to_string(),
            None => normalized.as_str().trim_start_matches("./").to_string(),
        }
    }

    pub fn path_config(&self) -> PathConfig {
        PathConfig::from_manifest(&self.manifest)
    }

    pub fn naming(&self) -> NamingMode {
        self.manifest.sync.naming
    }

    /// Resolve API credentials.
    ///
    /// `XSYNC_TOKEN` wins; otherwise the user-level credentials file is
    /// consulted. Missing credentials are a pre-batch fatal error.
    pub fn credentials(&self) -> Result<Credentials> {
        if let Ok(token) = std::env::var("XSYNC_TOKEN")
            && !token.is_empty()
        {
            return Ok(Credentials { token });
        }
        let path = credentials_path();
        if path.is_file()
            && let Ok(content) = std::fs::read_to_string(&path)
            && let Ok(file) = toml::from_str::<CredentialsFile>(&content)
            && !file.auth.token.is_empty()
        {
            return Ok(Credentials {
                token: file.auth.token,
            });
        }
        Err(Error::MissingCredentials { path })
    }
}

fn credentials_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("xsync")
        .join("credentials.toml")
}
