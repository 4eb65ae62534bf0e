//! xsync CLI
//!
//! Mirrors a remote workspace's programmable objects as XanoScript source
//! files on disk, and resolves identifiers back to tracked paths.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

#[tokio::main]
async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing if verbose
    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Failed to set tracing subscriber");
        tracing::debug!("Verbose mode enabled");
    }

    let cwd = std::env::current_dir()?;
    match cli.command {
        Commands::Init { url } => commands::run_init(&cwd, url.as_deref()),
        Commands::Sync { force, clean, json } => {
            commands::run_sync(&cwd, force, clean, json).await
        }
        Commands::Push { paths, clean, all } => {
            commands::run_push(&cwd, &paths, clean, all).await
        }
        Commands::Pull { paths, force, clean } => {
            commands::run_pull(&cwd, &paths, force, clean).await
        }
        Commands::Status { json, diff } => commands::run_status(&cwd, json, diff),
        Commands::Resolve { query, json } => commands::run_resolve(&cwd, &query, json),
        Commands::Index => commands::run_index(&cwd),
    }
}
