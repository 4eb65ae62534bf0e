//! Object store and metadata caches for xsync
//!
//! The object store is the persistent mapping between remote object
//! identities and local file paths, keyed by path, with the baseline
//! content hash recorded at the last successful sync. The search index and
//! the group/endpoint caches are derived state rebuilt from it.

pub mod caches;
pub mod error;
pub mod index;
pub mod store;

pub use caches::{EndpointCache, GroupCache};
pub use error::{Error, Result};
pub use index::{SearchIndex, SearchIndexEntry};
pub use store::{ObjectStore, SyncStatus, TrackedObject};
