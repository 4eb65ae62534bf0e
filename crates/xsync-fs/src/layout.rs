//! On-disk layout constants for an xsync project.

use std::path::Path;

/// Extension of materialized XanoScript source files, without the dot.
pub const SOURCE_EXT: &str = "xs";

/// Well-known state files under a project root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatePath {
    /// The `.xsync` directory (project state root)
    ConfigDir,
    /// The project manifest (`.xsync/config.toml`)
    Config,
    /// The object store (`.xsync/objects.json`)
    Objects,
    /// The persisted search index (`.xsync/index.json`)
    Index,
    /// The API-group cache (`.xsync/groups.json`)
    Groups,
    /// The endpoint cache (`.xsync/endpoints.json`)
    Endpoints,
}

impl StatePath {
    /// Get the path relative to the project root.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConfigDir => ".xsync",
            Self::Config => ".xsync/config.toml",
            Self::Objects => ".xsync/objects.json",
            Self::Index => ".xsync/index.json",
            Self::Groups => ".xsync/groups.json",
            Self::Endpoints => ".xsync/endpoints.json",
        }
    }
}

impl AsRef<Path> for StatePath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for StatePath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for StatePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
