//! Resolve command implementation

use std::path::Path;

use colored::Colorize;

use xsync_core::Resolver;
use xsync_fs::StatePath;
use xsync_store::{ObjectStore, SearchIndex};

use crate::commands::open_project;
use crate::error::{CliError, Result};

/// Run the resolve command
///
/// Uses the persisted search index when available, otherwise builds one
/// from the object store. Never touches the network.
pub fn run_resolve(path: &Path, query: &str, json: bool) -> Result<()> {
    let ctx = open_project(path)?;
    let store = ObjectStore::load_or_default(&ctx.state_file(StatePath::Objects))?;
    let index = SearchIndex::load_or_build(&ctx.state_file(StatePath::Index), &store);

    let matches = Resolver::new(&index).resolve(query);

    if json {
        println!("{}", serde_json::to_string_pretty(&matches)?);
        return Ok(());
    }

    if matches.is_empty() {
        return Err(CliError::user(format!("no match for '{query}'")));
    }
    for found in &matches {
        println!(
            "{} {} {}",
            found.path.cyan(),
            format!("[{}]", found.object_type).dimmed(),
            format!("({})", found.tier).dimmed()
        );
    }
    Ok(())
}
