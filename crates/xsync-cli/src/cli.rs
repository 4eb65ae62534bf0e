//! CLI argument parsing using clap derive

use clap::{Parser, Subcommand};

/// xsync - Mirror a remote workspace's objects as local source files
#[derive(Parser, Debug)]
#[command(name = "xsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Initialize an xsync project in the current directory
    ///
    /// Creates .xsync/config.toml and an empty object store.
    ///
    /// Examples:
    ///   xsync init
    ///   xsync init --url https://app.example.dev/api:meta
    Init {
        /// Base URL of the workspace metadata API
        #[arg(short, long)]
        url: Option<String>,
    },

    /// Fetch the remote workspace, diff against the store, and mirror
    /// new/updated objects to disk
    Sync {
        /// Overwrite files with unsynced local edits
        #[arg(long)]
        force: bool,

        /// Delete local files the remote no longer has
        #[arg(long)]
        clean: bool,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Push locally changed and untracked files to the remote
    ///
    /// With explicit paths, directories expand to their contained .xs
    /// files. Without paths, changed tracked files plus untracked files
    /// under the type directories are pushed.
    Push {
        /// Files or directories to push
        paths: Vec<String>,

        /// Delete remote objects for tracked files removed locally
        #[arg(long)]
        clean: bool,

        /// Push every source file, not just changed ones
        #[arg(long)]
        all: bool,
    },

    /// Write remote content to disk, protecting local edits
    Pull {
        /// Tracked paths to refetch individually
        paths: Vec<String>,

        /// Overwrite files with unsynced local edits
        #[arg(long)]
        force: bool,

        /// Delete local files the remote no longer has
        #[arg(long)]
        clean: bool,
    },

    /// Show the live state of every tracked and discovered file
    Status {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,

        /// Show unified diffs of modified files against their baselines
        #[arg(long)]
        diff: bool,
    },

    /// Resolve an identifier to tracked file paths
    ///
    /// Accepts exact paths, basenames, sanitized names, endpoint
    /// signatures like login_POST, and path suffixes.
    Resolve {
        /// The identifier to resolve
        query: String,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Rebuild the persisted search index from the object store
    Index,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_verbose_flag() {
        let cli = Cli::parse_from(["xsync", "-v", "status"]);
        assert!(cli.verbose);
    }

    #[test]
    fn parse_init_defaults() {
        let cli = Cli::parse_from(["xsync", "init"]);
        assert!(matches!(cli.command, Commands::Init { url: None }));
    }

    #[test]
    fn parse_init_with_url() {
        let cli = Cli::parse_from(["xsync", "init", "--url", "https://x.example/api:meta"]);
        match cli.command {
            Commands::Init { url } => {
                assert_eq!(url, Some("https://x.example/api:meta".to_string()));
            }
            _ => panic!("Expected Init command"),
        }
    }

    #[test]
    fn parse_sync_command() {
        let cli = Cli::parse_from(["xsync", "sync"]);
        assert!(matches!(
            cli.command,
            Commands::Sync {
                force: false,
                clean: false,
                json: false
            }
        ));
    }

    #[test]
    fn parse_sync_with_flags() {
        let cli = Cli::parse_from(["xsync", "sync", "--force", "--clean", "--json"]);
        assert!(matches!(
            cli.command,
            Commands::Sync {
                force: true,
                clean: true,
                json: true
            }
        ));
    }

    #[test]
    fn parse_push_with_paths() {
        let cli = Cli::parse_from(["xsync", "push", "functions/calc.xs", "apis"]);
        match cli.command {
            Commands::Push { paths, clean, all } => {
                assert_eq!(paths, vec!["functions/calc.xs", "apis"]);
                assert!(!clean);
                assert!(!all);
            }
            _ => panic!("Expected Push command"),
        }
    }

    #[test]
    fn parse_push_clean_and_all() {
        let cli = Cli::parse_from(["xsync", "push", "--clean", "--all"]);
        assert!(matches!(
            cli.command,
            Commands::Push { clean: true, all: true, .. }
        ));
    }

    #[test]
    fn parse_pull_with_force() {
        let cli = Cli::parse_from(["xsync", "pull", "--force", "functions/calc.xs"]);
        match cli.command {
            Commands::Pull { paths, force, clean } => {
                assert_eq!(paths, vec!["functions/calc.xs"]);
                assert!(force);
                assert!(!clean);
            }
            _ => panic!("Expected Pull command"),
        }
    }

    #[test]
    fn parse_status_command() {
        let cli = Cli::parse_from(["xsync", "status"]);
        assert!(matches!(
            cli.command,
            Commands::Status {
                json: false,
                diff: false
            }
        ));
    }

    #[test]
    fn parse_status_with_diff() {
        let cli = Cli::parse_from(["xsync", "status", "--diff"]);
        assert!(matches!(cli.command, Commands::Status { diff: true, .. }));
    }

    #[test]
    fn parse_resolve_command() {
        let cli = Cli::parse_from(["xsync", "resolve", "login_POST"]);
        match cli.command {
            Commands::Resolve { query, json } => {
                assert_eq!(query, "login_POST");
                assert!(!json);
            }
            _ => panic!("Expected Resolve command"),
        }
    }

    #[test]
    fn parse_index_command() {
        let cli = Cli::parse_from(["xsync", "index"]);
        assert!(matches!(cli.command, Commands::Index));
    }
}
