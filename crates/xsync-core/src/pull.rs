//! Pull engine
//!
//! Writes remote content to disk without ever silently overwriting local
//! edits: a file whose live hash has drifted from the tracked baseline is
//! skipped unless `force` is set. Bulk pulls reuse a single fetch instead
//! of one request per object.

use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, warn};

use xsync_fs::checksum::file_sha256;
use xsync_fs::{StatePath, io};
use xsync_remote::{FetchedObject, RemoteApi};
use xsync_store::{ObjectStore, SearchIndex, TrackedObject};

use crate::config::ProjectContext;
use crate::fetch::{FetchedSet, fetch_all};
use crate::paths::PathGenerator;
use crate::report::{FileError, PullReport};
use crate::{Error, Result};

enum WriteOutcome {
    Written,
    Skipped,
}

/// Pull engine bound to a project and a remote API collaborator.
pub struct PullEngine<'a> {
    ctx: &'a ProjectContext,
    api: &'a dyn RemoteApi,
}

impl<'a> PullEngine<'a> {
    pub fn new(ctx: &'a ProjectContext, api: &'a dyn RemoteApi) -> Self {
        Self { ctx, api }
    }

    /// Pull remote content to disk.
    ///
    /// With no explicit targets, a single bulk fetch populates all files;
    /// otherwise each target is refetched individually.
    pub async fn pull(
        &self,
        targets: &[String],
        force: bool,
        clean_local: bool,
    ) -> Result<PullReport> {
        if targets.is_empty() {
            let fetched = fetch_all(self.api).await?;
            self.apply_fetched(&fetched, force, clean_local)
        } else {
            self.pull_targets(targets, force).await
        }
    }

    /// Write a fetched set to disk and refresh the store, index, and
    /// metadata caches. Shared by bulk pull and the sync command.
    pub fn apply_fetched(
        &self,
        fetched: &FetchedSet,
        force: bool,
        clean_local: bool,
    ) -> Result<PullReport> {
        let mut store = ObjectStore::load_or_default(&self.ctx.state_file(StatePath::Objects))?;
        let config = self.ctx.path_config();
        let generator = PathGenerator::new(&config, self.ctx.naming());

        let mut report = PullReport::default();
        let mut fetched_paths: HashSet<String> = HashSet::new();

        for object in &fetched.objects {
            let rel = match generator.generate(object, &fetched.groups) {
                Ok(rel) => rel,
                Err(e) => {
                    report.errors.push(FileError::new(&object.name, e));
                    continue;
                }
            };
            fetched_paths.insert(rel.clone());
            match self.write_object(&mut store, &rel, object, force) {
                Ok(WriteOutcome::Written) => report.pulled.push(rel),
                Ok(WriteOutcome::Skipped) => report.skipped.push(rel),
                Err(e) => report.errors.push(FileError::new(rel, e)),
            }
        }

        if clean_local {
            let stale: Vec<TrackedObject> = store
                .entries()
                .iter()
                .filter(|e| !fetched_paths.contains(&e.path))
                .cloned()
                .collect();
            for entry in stale {
                let absolute = self.ctx.absolute(&entry.path);
                if absolute.is_file()
                    && let Err(e) = std::fs::remove_file(absolute.to_native())
                {
                    report.errors.push(FileError::new(&entry.path, e));
                    continue;
                }
                store.remove(&entry.path);
                report.deleted.push(entry.path);
            }
        }

        store.save(&self.ctx.state_file(StatePath::Objects))?;
        SearchIndex::build(&store).save(&self.ctx.state_file(StatePath::Index))?;
        fetched.groups.save(&self.ctx.state_file(StatePath::Groups))?;
        fetched
            .endpoints
            .save(&self.ctx.state_file(StatePath::Endpoints))?;

        debug!(
            pulled = report.pulled.len(),
            skipped = report.skipped.len(),
            "pull complete"
        );
        Ok(report)
    }

    /// Refetch explicitly named tracked paths one at a time.
    async fn pull_targets(&self, targets: &[String], force: bool) -> Result<PullReport> {
        let mut store = ObjectStore::load_or_default(&self.ctx.state_file(StatePath::Objects))?;
        let mut report = PullReport::default();

        for target in targets {
            let rel = self.ctx.relativize(Path::new(target));
            let tracked = match lookup(&store, &rel) {
                Some(tracked) => tracked.clone(),
                None => {
                    report
                        .errors
                        .push(FileError::new(&rel, Error::UntrackedPath { path: rel.clone() }));
                    continue;
                }
            };

            let raw = match self.api.get_object(tracked.object_type, tracked.id).await {
                Ok(raw) => raw,
                Err(e) => {
                    report.errors.push(FileError::new(&tracked.path, e));
                    continue;
                }
            };
            let Some(object) = raw.into_fetched(tracked.object_type) else {
                warn!(path = %tracked.path, "remote object has no source; skipping");
                report.skipped.push(tracked.path.clone());
                continue;
            };

            match self.write_object(&mut store, &tracked.path, &object, force) {
                Ok(WriteOutcome::Written) => report.pulled.push(tracked.path.clone()),
                Ok(WriteOutcome::Skipped) => report.skipped.push(tracked.path.clone()),
                Err(e) => report.errors.push(FileError::new(&tracked.path, e)),
            }
        }

        store.save(&self.ctx.state_file(StatePath::Objects))?;
        SearchIndex::build(&store).save(&self.ctx.state_file(StatePath::Index))?;
        Ok(report)
    }

    /// Write one object's content, honoring local-edit protection.
    ///
    /// The baseline hash is updated only after the file is written (or
    /// verified identical); a skip leaves the store entry untouched.
    fn write_object(
        &self,
        store: &mut ObjectStore,
        rel: &str,
        object: &FetchedObject,
        force: bool,
    ) -> Result<WriteOutcome> {
        let absolute = self.ctx.absolute(rel);

        if absolute.is_file() && !force {
            let live = file_sha256(absolute.as_ref())
                .map_err(|e| xsync_fs::Error::io(absolute.to_native(), e))?;
            let protected = match store.find_by_path(rel) {
                // unsynced local edit
                Some(tracked) => live != tracked.sha256,
                // a file we never synced occupies the target path
                None => true,
            };
            if protected {
                return Ok(WriteOutcome::Skipped);
            }
        }

        let unchanged = absolute.is_file() && io::read_text(&absolute)? == object.content;
        if !unchanged {
            io::write_text(&absolute, &object.content)?;
        }
        store.upsert(TrackedObject::new(
            object.id,
            object.object_type,
            rel,
            &object.content,
        ));
        Ok(WriteOutcome::Written)
    }
}

fn lookup<'s>(store: &'s ObjectStore, rel: &str) -> Option<&'s TrackedObject> {
    store
        .find_by_path(rel)
        .or_else(|| store.find_by_path(&format!("{rel}.{}", xsync_fs::SOURCE_EXT)))
}
