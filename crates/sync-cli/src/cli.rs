//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// settings-sync - Keep editor settings in a GitHub Gist
#[derive(Parser, Debug)]
#[command(name = "settings-sync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Tool configuration file
    #[arg(long, global = true, env = "SETTINGS_SYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Editor user folder (defaults to the platform location)
    #[arg(long, global = true, env = "SETTINGS_SYNC_USER_DIR")]
    pub user_dir: Option<PathBuf>,

    /// GitHub token with gist scope
    #[arg(long, global = true, env = "SETTINGS_SYNC_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Gist id holding the settings
    #[arg(long, global = true, env = "SETTINGS_SYNC_GIST")]
    pub gist: Option<String>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Create the sync descriptor and the tool configuration
    ///
    /// Examples:
    ///   settings-sync init --token ghp_xxx
    ///   settings-sync init --token ghp_xxx --gist 0123abcd
    Init {
        /// API base URL of a GitHub Enterprise instance
        #[arg(long)]
        enterprise_url: Option<String>,

        /// Create new gists as public
        #[arg(long)]
        public: bool,
    },

    /// Upload local settings to the gist
    Upload,

    /// Download settings from the gist
    Download {
        /// Download even when the local copy is current
        #[arg(short, long)]
        force: bool,
    },

    /// Show configuration and sync timestamps
    Status {
        /// Skip reading the remote marker
        #[arg(long)]
        offline: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_download_force() {
        let cli = Cli::try_parse_from(["settings-sync", "download", "--force"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Download { force: true }));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["settings-sync", "upload", "--gist", "abc", "--verbose"]).unwrap();
        assert_eq!(cli.gist.as_deref(), Some("abc"));
        assert!(cli.verbose);
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
