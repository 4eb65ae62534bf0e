//! Sync command implementation
//!
//! One bulk fetch, a hash-only diff against the object store, then the
//! pull engine mirrors new and updated objects to disk.

use std::path::Path;

use colored::Colorize;
use serde::Serialize;

use xsync_core::report::FileError;
use xsync_core::{PullEngine, diff, fetch_all};
use xsync_fs::StatePath;
use xsync_store::ObjectStore;

use crate::commands::{open_project, remote_api};
use crate::error::{CliError, Result};

/// Machine-readable sync summary for `--json`.
#[derive(Debug, Serialize)]
struct SyncSummary {
    new: usize,
    updated: usize,
    removed: usize,
    pulled: usize,
    skipped: usize,
    deleted: usize,
    errors: Vec<FileError>,
}

/// Run the sync command
pub async fn run_sync(path: &Path, force: bool, clean: bool, json: bool) -> Result<()> {
    let ctx = open_project(path)?;
    let api = remote_api(&ctx)?;

    if !json {
        println!("{} Syncing workspace objects...", "=>".blue().bold());
    }

    let fetched = fetch_all(&api).await?;
    let store = ObjectStore::load_or_default(&ctx.state_file(StatePath::Objects))?;
    let diff_report = diff(&store, &fetched.objects);
    let (new, updated, removed) = (
        diff_report.new.len(),
        diff_report.updated.len(),
        diff_report.removed.len(),
    );

    let pull_report = PullEngine::new(&ctx, &api).apply_fetched(&fetched, force, clean)?;

    if json {
        let summary = SyncSummary {
            new,
            updated,
            removed,
            pulled: pull_report.pulled_count(),
            skipped: pull_report.skipped_count(),
            deleted: pull_report.deleted.len(),
            errors: pull_report.errors.clone(),
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "{} {} new, {} updated, {} removed remotely",
            "OK".green().bold(),
            new,
            updated,
            removed
        );
        println!(
            "   {} pulled, {} skipped (local edits)",
            pull_report.pulled_count(),
            pull_report.skipped_count()
        );
        for deleted in &pull_report.deleted {
            println!("   {} {}", "-".yellow(), deleted.cyan());
        }
        for skipped in &pull_report.skipped {
            println!(
                "   {} {} has local edits (use {} to overwrite)",
                "!".yellow(),
                skipped.cyan(),
                "--force".cyan()
            );
        }
        for error in &pull_report.errors {
            println!("   {} {}: {}", "!".red(), error.path.cyan(), error.message);
        }
    }

    if pull_report.is_clean() {
        Ok(())
    } else {
        Err(CliError::user("sync completed with errors"))
    }
}
