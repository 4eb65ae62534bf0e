//! Index command implementation

use std::path::Path;

use colored::Colorize;

use xsync_fs::StatePath;
use xsync_store::{ObjectStore, SearchIndex};

use crate::commands::open_project;
use crate::error::Result;

/// Run the index command
///
/// Force-rebuilds the persisted search index from the object store.
pub fn run_index(path: &Path) -> Result<()> {
    let ctx = open_project(path)?;
    let store = ObjectStore::load_or_default(&ctx.state_file(StatePath::Objects))?;

    let index = SearchIndex::build(&store);
    index.save(&ctx.state_file(StatePath::Index))?;

    println!(
        "{} Indexed {} object(s).",
        "OK".green().bold(),
        index.entries().len()
    );
    Ok(())
}
