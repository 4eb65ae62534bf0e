//! Push command implementation

use std::path::Path;

use colored::Colorize;

use xsync_core::PushEngine;

use crate::commands::{open_project, remote_api};
use crate::error::{CliError, Result};

/// Run the push command
///
/// `--all` expands to every existing type directory, so the whole tree is
/// pushed through the same explicit-target path expansion.
pub async fn run_push(path: &Path, paths: &[String], clean: bool, all: bool) -> Result<()> {
    let ctx = open_project(path)?;
    let api = remote_api(&ctx)?;

    let targets: Vec<String> = if all {
        ctx.path_config()
            .type_directories()
            .into_iter()
            .filter(|dir| ctx.absolute(dir).is_dir())
            .collect()
    } else {
        paths.to_vec()
    };

    println!("{} Pushing local changes...", "=>".blue().bold());

    let report = PushEngine::new(&ctx, &api).push(&targets, clean).await?;

    if report.pushed.is_empty() && report.orphans.is_empty() && report.is_clean() {
        println!("{} Nothing to push.", "OK".green().bold());
    } else {
        println!("{} Pushed {} object(s):", "OK".green().bold(), report.pushed_count());
        for pushed in &report.pushed {
            println!("   {} {}", "+".green(), pushed.cyan());
        }
    }

    if !report.orphans.is_empty() {
        println!(
            "{} Tracked files missing locally (use {} to delete remotely):",
            "ORPHANS".yellow().bold(),
            "--clean".cyan()
        );
        for orphan in &report.orphans {
            println!("   {} {}", "-".yellow(), orphan.cyan());
        }
    }
    for deleted in &report.deleted_orphans {
        println!("   {} deleted remote object for {}", "-".yellow(), deleted.cyan());
    }
    for error in &report.errors {
        println!("   {} {}: {}", "!".red(), error.path.cyan(), error.message);
    }

    if report.is_clean() {
        Ok(())
    } else {
        Err(CliError::user("push completed with errors"))
    }
}
