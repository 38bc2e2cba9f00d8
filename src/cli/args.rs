//! Command-line argument definitions using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// langvm - install, remove and switch language runtime versions
///
/// Without a subcommand the interactive terminal UI starts.
#[derive(Parser, Debug)]
#[command(name = "langvm")]
#[command(version)]
#[command(about = "Language runtime version manager", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Run the backend in-process instead of talking to langvmd
    #[arg(long, global = true)]
    pub no_daemon: bool,

    /// Daemon socket path (default: $XDG_RUNTIME_DIR/langvm.sock)
    #[arg(long, global = true, value_name = "PATH")]
    pub socket: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open the interactive terminal UI
    Ui {
        /// Route to open (/, /python, /python/classic, /settings)
        #[arg(long, value_name = "PATH")]
        route: Option<String>,
    },

    /// List available versions with install and active status
    #[command(visible_alias = "ls")]
    List {
        /// Language (default: python)
        #[arg(default_value = "python")]
        language: String,
        /// Page number, starting at 1
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Versions per page (default from config)
        #[arg(long, value_name = "N")]
        page_size: Option<usize>,
        /// Only versions containing this text
        #[arg(short, long, value_name = "KEYWORD")]
        search: Option<String>,
        /// Show every version on one page, without search or paging
        #[arg(long, conflicts_with_all = ["page", "page_size", "search"])]
        classic: bool,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Install a version
    #[command(visible_alias = "i", disable_version_flag = true)]
    Install {
        /// Language (e.g., python)
        language: String,
        /// Version (e.g., 3.12.1)
        version: String,
    },

    /// Remove an installed version
    #[command(visible_alias = "rm", disable_version_flag = true)]
    Uninstall {
        /// Language (e.g., python)
        language: String,
        /// Version (e.g., 3.12.1)
        version: String,
    },

    /// Make an installed version the active one
    #[command(disable_version_flag = true)]
    Use {
        /// Language (e.g., python)
        language: String,
        /// Version (e.g., 3.12.1)
        version: String,
    },

    /// Print shell completions to stdout
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },

    /// Print the effective configuration as TOML
    Config {
        /// Write the effective configuration to the config file if none exists
        #[arg(long)]
        init: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_means_ui() {
        let cli = Cli::try_parse_from(["langvm"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_list_defaults() {
        let cli = Cli::try_parse_from(["langvm", "list"]).unwrap();
        let Some(Commands::List {
            language,
            page,
            classic,
            ..
        }) = cli.command
        else {
            panic!("expected list");
        };
        assert_eq!(language, "python");
        assert_eq!(page, 1);
        assert!(!classic);
    }

    #[test]
    fn test_classic_conflicts_with_search() {
        assert!(Cli::try_parse_from(["langvm", "list", "--classic", "--search", "3.12"]).is_err());
    }

    #[test]
    fn test_completions_shell_is_parsed() {
        let cli = Cli::try_parse_from(["langvm", "completions", "zsh"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Completions {
                shell: clap_complete::Shell::Zsh
            })
        ));
        assert!(Cli::try_parse_from(["langvm", "completions", "tcsh"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["langvm", "install", "python", "3.12.0", "--no-daemon", "-vv"])
            .unwrap();
        assert!(cli.no_daemon);
        assert_eq!(cli.verbose, 2);
    }
}
