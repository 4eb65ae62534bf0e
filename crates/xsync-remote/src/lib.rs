//! Remote workspace model and API client for xsync
//!
//! Defines the fixed enumeration of programmable object types, the
//! ephemeral fetched-object record, the `RemoteApi` collaborator trait the
//! engines are written against, and its reqwest-backed HTTP implementation.

pub mod api;
pub mod decode;
pub mod error;
pub mod http;
pub mod types;

pub use api::{CreatedObject, RemoteApi, RequestOptions};
pub use error::{Error, Result};
pub use http::HttpRemoteApi;
pub use types::{FetchedObject, ObjectType, RawObject};
