//! Push engine
//!
//! Detects locally changed and untracked files, creates or updates the
//! corresponding remote objects, and reports tracked files whose local
//! copy has been deleted (orphans). Failures are isolated per file; the
//! batch always runs to completion.

use std::path::Path;

use tracing::{debug, warn};

use xsync_fs::checksum::file_sha256;
use xsync_fs::{NormalizedPath, StatePath, io};
use xsync_remote::{ObjectType, RemoteApi, RequestOptions};
use xsync_store::{ObjectStore, SearchIndex, TrackedObject};

use crate::config::ProjectContext;
use crate::report::{FileError, PushReport};
use crate::sniff::sniff_object_type;
use crate::{Error, Result};

/// Push engine bound to a project and a remote API collaborator.
pub struct PushEngine<'a> {
    ctx: &'a ProjectContext,
    api: &'a dyn RemoteApi,
}

impl<'a> PushEngine<'a> {
    pub fn new(ctx: &'a ProjectContext, api: &'a dyn RemoteApi) -> Self {
        Self { ctx, api }
    }

    /// Push local changes to the remote.
    ///
    /// With explicit targets, directories expand to their contained source
    /// files; otherwise candidates are the tracked files whose live hash
    /// drifted from the baseline plus untracked source files under the
    /// type directories. Orphans are reported, and deleted remotely only
    /// when `clean_orphans` is set.
    pub async fn push(&self, targets: &[String], clean_orphans: bool) -> Result<PushReport> {
        let mut store = ObjectStore::load_or_default(&self.ctx.state_file(StatePath::Objects))?;
        let mut report = PushReport::default();

        let candidates = if targets.is_empty() {
            self.changed_and_untracked(&store, &mut report)?
        } else {
            self.expand_targets(targets)?
        };

        for rel in candidates {
            match self.push_one(&mut store, &rel).await {
                Ok(()) => report.pushed.push(rel),
                Err(e) => report.errors.push(FileError::new(rel, e)),
            }
        }

        // Orphan detection runs over the whole store, after the batch.
        let orphans: Vec<TrackedObject> = store
            .entries()
            .iter()
            .filter(|e| !self.ctx.absolute(&e.path).is_file())
            .cloned()
            .collect();
        for orphan in orphans {
            if clean_orphans {
                match self.api.delete_object(orphan.object_type, orphan.id).await {
                    Ok(()) => {
                        store.remove(&orphan.path);
                        report.deleted_orphans.push(orphan.path);
                    }
                    Err(e) => report.errors.push(FileError::new(orphan.path, e)),
                }
            } else {
                report.orphans.push(orphan.path);
            }
        }

        store.save(&self.ctx.state_file(StatePath::Objects))?;
        SearchIndex::build(&store).save(&self.ctx.state_file(StatePath::Index))?;

        debug!(
            pushed = report.pushed.len(),
            orphans = report.orphans.len(),
            "push complete"
        );
        Ok(report)
    }

    /// Push a single file, updating the store entry only on success.
    async fn push_one(&self, store: &mut ObjectStore, rel: &str) -> Result<()> {
        let absolute = self.ctx.absolute(rel);
        let content = io::read_text(&absolute)?;

        if let Some(tracked) = store.find_by_path(rel).cloned() {
            // the stored type is authoritative for tracked paths
            self.update_tracked(store, rel, &tracked, &content).await
        } else {
            self.create_untracked(store, rel, &content).await
        }
    }

    async fn update_tracked(
        &self,
        store: &mut ObjectStore,
        rel: &str,
        tracked: &TrackedObject,
        content: &str,
    ) -> Result<()> {
        let options = self.options_for(store, rel, tracked.object_type)?;

        match self
            .api
            .update_object(tracked.object_type, tracked.id, content, options)
            .await
        {
            Ok(()) => {
                let mut entry = tracked.clone();
                entry.record_synced_content(content);
                store.upsert(entry);
                Ok(())
            }
            Err(e)
                if e.is_uniqueness_conflict()
                    && tracked.object_type.uses_delete_recreate_recovery() =>
            {
                warn!(path = rel, "uniqueness conflict; recovering by delete and recreate");
                self.delete_and_recreate(store, rel, tracked, content, options)
                    .await
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Recovery path for uniqueness conflicts: delete the remote object,
    /// recreate it from the local content, keep the path mapping under the
    /// new remote id. If the recreate fails after the delete succeeded,
    /// the remote object is gone for good; the store entry is dropped so a
    /// later push recreates the file as untracked, and the failure is
    /// surfaced as its own error.
    async fn delete_and_recreate(
        &self,
        store: &mut ObjectStore,
        rel: &str,
        tracked: &TrackedObject,
        content: &str,
        options: RequestOptions,
    ) -> Result<()> {
        self.api
            .delete_object(tracked.object_type, tracked.id)
            .await?;

        match self
            .api
            .create_object(tracked.object_type, content, options)
            .await
        {
            Ok(created) => {
                store.upsert(TrackedObject::new(
                    created.id,
                    tracked.object_type,
                    rel,
                    content,
                ));
                Ok(())
            }
            Err(e) => {
                store.remove(rel);
                Err(Error::RecreateFailed {
                    path: rel.to_string(),
                    message: e.to_string(),
                })
            }
        }
    }

    async fn create_untracked(
        &self,
        store: &mut ObjectStore,
        rel: &str,
        content: &str,
    ) -> Result<()> {
        let object_type = sniff_object_type(content).ok_or_else(|| Error::UnknownObjectType {
            path: rel.to_string(),
        })?;
        let options = self.options_for(store, rel, object_type)?;

        let created = self.api.create_object(object_type, content, options).await?;
        store.upsert(TrackedObject::new(created.id, object_type, rel, content));
        Ok(())
    }

    /// Endpoints must name their owning API group: the tracked api_group
    /// sibling in the same directory supplies it. Other types need no
    /// options.
    fn options_for(
        &self,
        store: &ObjectStore,
        rel: &str,
        object_type: ObjectType,
    ) -> Result<RequestOptions> {
        if object_type != ObjectType::ApiEndpoint {
            return Ok(RequestOptions::default());
        }
        let parent = NormalizedPath::new(rel).parent();
        let group = store.entries_of_type(ObjectType::ApiGroup).find(|g| {
            NormalizedPath::new(&g.path).parent() == parent
        });
        match group {
            Some(group) => Ok(RequestOptions::with_group(group.id)),
            None => Err(Error::MissingApiGroup {
                path: rel.to_string(),
            }),
        }
    }

    /// Tracked files whose live hash drifted, plus untracked source files
    /// under the configured type directories. Unreadable files become
    /// per-file errors instead of aborting discovery.
    fn changed_and_untracked(
        &self,
        store: &ObjectStore,
        report: &mut PushReport,
    ) -> Result<Vec<String>> {
        let mut candidates = Vec::new();

        for tracked in store.entries() {
            let absolute = self.ctx.absolute(&tracked.path);
            if !absolute.is_file() {
                continue; // orphan; handled after the batch
            }
            match file_sha256(absolute.as_ref()) {
                Ok(live) if live != tracked.sha256 => candidates.push(tracked.path.clone()),
                Ok(_) => {}
                Err(e) => report.errors.push(FileError::new(&tracked.path, e)),
            }
        }

        for dir in self.ctx.path_config().type_directories() {
            let found = io::collect_source_files(&self.ctx.root, &self.ctx.root.join(&dir))?;
            for rel in found {
                let rel = rel.as_str().to_string();
                if store.find_by_path(&rel).is_none() && !candidates.contains(&rel) {
                    candidates.push(rel);
                }
            }
        }

        Ok(candidates)
    }

    /// Expand explicit targets: directories to their contained source
    /// files, files to themselves.
    fn expand_targets(&self, targets: &[String]) -> Result<Vec<String>> {
        let mut candidates = Vec::new();
        for target in targets {
            let rel = self.ctx.relativize(Path::new(target));
            let absolute = self.ctx.absolute(&rel);
            if absolute.is_dir() {
                for found in io::collect_source_files(&self.ctx.root, &absolute)? {
                    let rel = found.as_str().to_string();
                    if !candidates.contains(&rel) {
                        candidates.push(rel);
                    }
                }
            } else if !candidates.contains(&rel) {
                candidates.push(rel);
            }
        }
        Ok(candidates)
    }
}
