//! Status command implementation

use std::path::Path;

use colored::Colorize;

use xsync_core::status::{FileState, drift_diff, scan};
use xsync_fs::StatePath;
use xsync_store::ObjectStore;

use crate::commands::open_project;
use crate::error::Result;

/// Run the status command
///
/// Recomputes the live classification of every tracked object and
/// discovers untracked source files. `--diff` renders each modified
/// file's drift against its synced baseline.
pub fn run_status(path: &Path, json: bool, diff: bool) -> Result<()> {
    let ctx = open_project(path)?;
    let report = scan(&ctx)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if report.is_clean() {
        println!(
            "{} {} tracked object(s), all in sync.",
            "OK".green().bold(),
            report.entries.len()
        );
        return Ok(());
    }

    println!("{} Workspace state:", "=>".blue().bold());
    for entry in &report.entries {
        let marker = match entry.state {
            FileState::InSync => continue,
            FileState::Modified => "M".yellow().bold(),
            FileState::Missing => "D".red().bold(),
            FileState::Untracked => "?".cyan().bold(),
        };
        println!("   {} {}", marker, entry.path.cyan());
    }
    println!();
    println!(
        "{} in sync, {} modified, {} missing, {} untracked",
        report.count(FileState::InSync),
        report.count(FileState::Modified),
        report.count(FileState::Missing),
        report.count(FileState::Untracked)
    );

    if diff {
        let store = ObjectStore::load_or_default(&ctx.state_file(StatePath::Objects))?;
        for entry in &report.entries {
            if entry.state != FileState::Modified {
                continue;
            }
            if let Some(tracked) = store.find_by_path(&entry.path)
                && let Some(rendered) = drift_diff(&ctx, tracked)?
            {
                println!();
                println!("{rendered}");
            }
        }
    }

    Ok(())
}
