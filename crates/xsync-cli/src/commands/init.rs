//! Init command implementation

use std::path::Path;

use colored::Colorize;

use xsync_core::{Manifest, ProjectContext};

use crate::error::Result;

/// Run the init command
///
/// Scaffolds `.xsync/config.toml` and an empty object store in `path`.
pub fn run_init(path: &Path, url: Option<&str>) -> Result<()> {
    let default_url = Manifest::default().remote.api_url;
    let ctx = ProjectContext::init(path, url.unwrap_or(&default_url))?;

    println!(
        "{} Initialized xsync project at {}",
        "OK".green().bold(),
        ctx.root.as_str().cyan()
    );
    println!();
    println!("Run {} to mirror the remote workspace.", "xsync sync".cyan());
    Ok(())
}
