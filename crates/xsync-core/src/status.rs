//! Live status classification
//!
//! The authoritative state of every tracked file is recomputed here by
//! comparing live content hashes against the stored baselines; the
//! persisted `status` field is refreshed as a side effect but never
//! trusted. The baseline snapshot enables a human-readable drift diff.

use serde::Serialize;
use similar::TextDiff;

use xsync_fs::checksum::file_sha256;
use xsync_fs::{StatePath, io};
use xsync_remote::ObjectType;
use xsync_store::{ObjectStore, SyncStatus, TrackedObject};

use crate::config::ProjectContext;
use crate::Result;

/// Live classification of one project path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileState {
    /// Live hash equals the baseline
    InSync,
    /// Live hash differs from the baseline
    Modified,
    /// Tracked, but the file no longer exists (orphan)
    Missing,
    /// A source file on disk with no store entry
    Untracked,
}

impl std::fmt::Display for FileState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::InSync => "in-sync",
            Self::Modified => "modified",
            Self::Missing => "missing",
            Self::Untracked => "untracked",
        };
        write!(f, "{label}")
    }
}

/// One classified path.
#[derive(Debug, Clone, Serialize)]
pub struct StatusEntry {
    pub path: String,
    pub state: FileState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_type: Option<ObjectType>,
}

/// Classification of every tracked and discovered path.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatusReport {
    pub entries: Vec<StatusEntry>,
}

impl StatusReport {
    pub fn count(&self, state: FileState) -> usize {
        self.entries.iter().filter(|e| e.state == state).count()
    }

    pub fn is_clean(&self) -> bool {
        self.entries.iter().all(|e| e.state == FileState::InSync)
    }
}

/// Classify every tracked object and discover untracked source files.
///
/// Refreshes the informational `status` field in the store file.
pub fn scan(ctx: &ProjectContext) -> Result<StatusReport> {
    let mut store = ObjectStore::load_or_default(&ctx.state_file(StatePath::Objects))?;
    let mut report = StatusReport::default();

    let tracked: Vec<TrackedObject> = store.entries().to_vec();
    for entry in &tracked {
        let absolute = ctx.absolute(&entry.path);
        let state = if !absolute.is_file() {
            FileState::Missing
        } else {
            match file_sha256(absolute.as_ref()) {
                Ok(live) if live == entry.sha256 => FileState::InSync,
                Ok(_) => FileState::Modified,
                Err(_) => FileState::Missing,
            }
        };
        store.set_status(
            &entry.path,
            match state {
                FileState::InSync => SyncStatus::Synced,
                FileState::Modified => SyncStatus::Modified,
                _ => SyncStatus::Missing,
            },
        );
        report.entries.push(StatusEntry {
            path: entry.path.clone(),
            state,
            object_type: Some(entry.object_type),
        });
    }

    for dir in ctx.path_config().type_directories() {
        for found in io::collect_source_files(&ctx.root, &ctx.root.join(&dir))? {
            let rel = found.as_str().to_string();
            if store.find_by_path(&rel).is_none() {
                report.entries.push(StatusEntry {
                    path: rel,
                    state: FileState::Untracked,
                    object_type: None,
                });
            }
        }
    }

    store.save(&ctx.state_file(StatePath::Objects))?;
    Ok(report)
}

/// Unified diff between the baseline snapshot and the live file.
///
/// Returns `None` when the file is missing, the snapshot cannot be
/// decoded, or there is no drift.
pub fn drift_diff(ctx: &ProjectContext, tracked: &TrackedObject) -> Result<Option<String>> {
    let absolute = ctx.absolute(&tracked.path);
    if !absolute.is_file() {
        return Ok(None);
    }
    let Some(baseline) = tracked.snapshot() else {
        return Ok(None);
    };
    let live = io::read_text(&absolute)?;
    if baseline == live {
        return Ok(None);
    }

    let text_diff = TextDiff::from_lines(&baseline, &live);
    let rendered = text_diff
        .unified_diff()
        .context_radius(3)
        .header(
            &format!("{} (synced)", tracked.path),
            &format!("{} (local)", tracked.path),
        )
        .to_string();
    Ok(Some(rendered))
}
