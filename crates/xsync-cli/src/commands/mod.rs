//! Command implementations

mod index;
mod init;
mod pull;
mod push;
mod resolve;
mod status;
mod sync;

pub use index::run_index;
pub use init::run_init;
pub use pull::run_pull;
pub use push::run_push;
pub use resolve::run_resolve;
pub use status::run_status;
pub use sync::run_sync;

use std::path::Path;

use xsync_core::ProjectContext;
use xsync_remote::HttpRemoteApi;

use crate::error::Result;

/// Discover the project for a command invocation.
pub(crate) fn open_project(path: &Path) -> Result<ProjectContext> {
    Ok(ProjectContext::discover(path)?)
}

/// Build the HTTP API client from the project's configuration and the
/// user's credentials. Missing credentials abort before any batch work.
pub(crate) fn remote_api(ctx: &ProjectContext) -> Result<HttpRemoteApi> {
    let credentials = ctx.credentials()?;
    Ok(HttpRemoteApi::new(
        &ctx.manifest.remote.api_url,
        &credentials.token,
    )?)
}
