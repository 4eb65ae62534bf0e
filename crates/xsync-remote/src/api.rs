//! RemoteApi collaborator trait
//!
//! The engines are written against this trait, not the HTTP client, so
//! tests can substitute an in-memory fake. All calls are issued one at a
//! time and awaited before the next begins.

use async_trait::async_trait;

use crate::Result;
use crate::types::{ObjectType, RawObject};

/// Identity assigned by the remote on create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreatedObject {
    pub id: u64,
}

/// Optional parameters for create/update calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Owning API group, required when creating an endpoint.
    pub group_id: Option<u64>,
}

impl RequestOptions {
    pub fn with_group(group_id: u64) -> Self {
        Self {
            group_id: Some(group_id),
        }
    }
}

/// Remote workspace API consumed by the sync engines.
#[async_trait]
pub trait RemoteApi: Send + Sync {
    /// List one page of a collection. A page shorter than `per_page`
    /// terminates pagination.
    async fn list_objects(
        &self,
        object_type: ObjectType,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<RawObject>>;

    /// Create a new remote object from XanoScript source.
    async fn create_object(
        &self,
        object_type: ObjectType,
        content: &str,
        options: RequestOptions,
    ) -> Result<CreatedObject>;

    /// Update an existing remote object in place.
    async fn update_object(
        &self,
        object_type: ObjectType,
        id: u64,
        content: &str,
        options: RequestOptions,
    ) -> Result<()>;

    /// Delete a remote object.
    async fn delete_object(&self, object_type: ObjectType, id: u64) -> Result<()>;

    /// Fetch a single object, used as the per-path refetch fallback.
    async fn get_object(&self, object_type: ObjectType, id: u64) -> Result<RawObject>;
}
