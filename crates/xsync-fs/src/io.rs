//! Atomic file I/O
//!
//! State files (object store, search index, caches) are written with a
//! write-to-temp-then-rename strategy so a crashed process never leaves a
//! truncated file behind. Exactly one process is assumed to operate on a
//! project at a time; there is no advisory locking.

use std::fs;

use crate::{Error, NormalizedPath, Result};

/// Write content atomically to a file.
///
/// Creates the parent directory if needed, writes to a temporary sibling
/// file, then renames over the target.
pub fn write_atomic(path: &NormalizedPath, content: &[u8]) -> Result<()> {
    let native = path.to_native();

    if let Some(parent) = native.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    // Temp file in the same directory so the rename stays on one filesystem
    let temp_name = format!(
        ".{}.{}.tmp",
        native
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    let temp_path = native.with_file_name(&temp_name);

    fs::write(&temp_path, content).map_err(|e| Error::io(&temp_path, e))?;
    fs::rename(&temp_path, &native).map_err(|e| Error::io(&native, e))?;

    Ok(())
}

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native = path.to_native();
    fs::read_to_string(&native).map_err(|e| Error::io(&native, e))
}

/// Write text content to a file atomically.
pub fn write_text(path: &NormalizedPath, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes())
}

/// Recursively collect all `.xs` source files under a directory.
///
/// Returned paths are normalized and relative to `root`. Missing
/// directories yield an empty list rather than an error, so callers can
/// scan type directories that have not been materialized yet. Results are
/// sorted for deterministic batch ordering.
pub fn collect_source_files(root: &NormalizedPath, dir: &NormalizedPath) -> Result<Vec<NormalizedPath>> {
    let mut found = Vec::new();
    if !dir.is_dir() {
        return Ok(found);
    }
    walk_sources(root, dir, &mut found)?;
    found.sort_by(|a, b| a.as_str().cmp(b.as_str()));
    Ok(found)
}

fn walk_sources(
    root: &NormalizedPath,
    dir: &NormalizedPath,
    found: &mut Vec<NormalizedPath>,
) -> Result<()> {
    let native = dir.to_native();
    let entries = fs::read_dir(&native).map_err(|e| Error::io(&native, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(&native, e))?;
        let path = NormalizedPath::new(entry.path());
        if path.is_dir() {
            walk_sources(root, &path, found)?;
        } else if path.extension() == Some(crate::layout::SOURCE_EXT)
            && let Some(rel) = path.strip_prefix(root)
        {
            found.push(rel);
        }
    }
    Ok(())
}
