//! Fetch/diff engine
//!
//! Bulk retrieval of every remote collection, and the hash-only diff that
//! classifies fetched objects against the tracked store. The diff never
//! touches the filesystem and is safe to run repeatedly.

use std::collections::HashSet;

use tracing::debug;

use xsync_fs::checksum::content_sha256;
use xsync_remote::{FetchedObject, ObjectType, RemoteApi};
use xsync_store::{EndpointCache, GroupCache, ObjectStore, TrackedObject};

use crate::Result;

/// Page size for bulk collection listing.
pub const FETCH_PAGE_SIZE: u32 = 1000;

/// Everything one bulk fetch produces: decoded objects plus the
/// group/endpoint metadata caches.
#[derive(Debug, Default)]
pub struct FetchedSet {
    pub objects: Vec<FetchedObject>,
    pub groups: GroupCache,
    pub endpoints: EndpointCache,
}

/// Retrieve all remote object collections.
///
/// API groups are listed first so group display names are available when
/// endpoint paths are generated. Objects with no extractable source are
/// skipped; group and endpoint cache entries are recorded regardless,
/// since the caches are metadata rather than content.
pub async fn fetch_all(api: &dyn RemoteApi) -> Result<FetchedSet> {
    let mut set = FetchedSet::default();

    for object_type in ObjectType::ALL {
        let mut page = 1;
        loop {
            let batch = api.list_objects(object_type, page, FETCH_PAGE_SIZE).await?;
            let batch_len = batch.len();

            for raw in batch {
                match object_type {
                    ObjectType::ApiGroup => {
                        set.groups.insert(
                            raw.name.clone(),
                            raw.id,
                            raw.canonical.clone().unwrap_or_default(),
                        );
                    }
                    ObjectType::ApiEndpoint => {
                        if let (Some(verb), Some(path)) = (&raw.verb, &raw.path) {
                            set.endpoints.insert(
                                verb,
                                path,
                                raw.id,
                                raw.canonical.clone().unwrap_or_default(),
                            );
                        }
                    }
                    _ => {}
                }
                if let Some(fetched) = raw.into_fetched(object_type) {
                    set.objects.push(fetched);
                }
            }

            if batch_len < FETCH_PAGE_SIZE as usize {
                break;
            }
            page += 1;
        }
    }

    debug!(
        objects = set.objects.len(),
        groups = set.groups.len(),
        "bulk fetch complete"
    );
    Ok(set)
}

/// Classification of fetched objects against the tracked store.
#[derive(Debug, Default)]
pub struct DiffReport<'a> {
    /// Remote objects with no tracked `(type, id)`
    pub new: Vec<&'a FetchedObject>,
    /// Tracked objects whose remote content hash differs from the baseline
    pub updated: Vec<&'a FetchedObject>,
    /// Tracked objects absent from the fetched set
    pub removed: Vec<TrackedObject>,
}

impl DiffReport<'_> {
    pub fn is_empty(&self) -> bool {
        self.new.is_empty() && self.updated.is_empty() && self.removed.is_empty()
    }
}

/// Diff fetched objects against the store, keyed by `(type, id)`.
///
/// Purely hash-based; idempotent against an unchanged remote and store.
pub fn diff<'a>(store: &ObjectStore, fetched: &'a [FetchedObject]) -> DiffReport<'a> {
    let mut report = DiffReport::default();
    let mut seen: HashSet<(ObjectType, u64)> = HashSet::new();

    for object in fetched {
        seen.insert((object.object_type, object.id));
        match store.find_by_identity(object.object_type, object.id) {
            None => report.new.push(object),
            Some(tracked) => {
                if content_sha256(&object.content) != tracked.sha256 {
                    report.updated.push(object);
                }
            }
        }
    }

    for tracked in store.entries() {
        if !seen.contains(&(tracked.object_type, tracked.id)) {
            report.removed.push(tracked.clone());
        }
    }

    report
}
