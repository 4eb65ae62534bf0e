//! Pull command implementation

use std::path::Path;

use colored::Colorize;

use xsync_core::PullEngine;

use crate::commands::{open_project, remote_api};
use crate::error::{CliError, Result};

/// Run the pull command
pub async fn run_pull(path: &Path, paths: &[String], force: bool, clean: bool) -> Result<()> {
    let ctx = open_project(path)?;
    let api = remote_api(&ctx)?;

    println!("{} Pulling remote content...", "=>".blue().bold());

    let report = PullEngine::new(&ctx, &api).pull(paths, force, clean).await?;

    println!(
        "{} {} pulled, {} skipped",
        "OK".green().bold(),
        report.pulled_count(),
        report.skipped_count()
    );
    for skipped in &report.skipped {
        println!(
            "   {} {} has local edits (use {} to overwrite)",
            "!".yellow(),
            skipped.cyan(),
            "--force".cyan()
        );
    }
    for deleted in &report.deleted {
        println!("   {} {}", "-".yellow(), deleted.cyan());
    }
    for error in &report.errors {
        println!("   {} {}: {}", "!".red(), error.path.cyan(), error.message);
    }

    if report.is_clean() {
        Ok(())
    } else {
        Err(CliError::user("pull completed with errors"))
    }
}
