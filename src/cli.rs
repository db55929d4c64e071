//! CLI argument parsing with clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::operator::ReviewMode;

#[derive(Parser)]
#[command(name = "hostscrub")]
#[command(author, version, about = "Hosts-file blocklist cleaner with diff review and rollback")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "/etc/hostscrub/config.yaml", global = true)]
    pub config: PathBuf,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug output)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// How reviews are answered by one-shot commands
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct ReviewArgs {
    /// Apply every change without asking
    #[arg(short, long, conflicts_with = "dry_run")]
    pub yes: bool,

    /// Show the diffs, apply nothing
    #[arg(long)]
    pub dry_run: bool,
}

impl ReviewArgs {
    pub fn mode(&self) -> ReviewMode {
        if self.dry_run {
            ReviewMode::DryRun
        } else if self.yes {
            ReviewMode::AssumeYes
        } else {
            ReviewMode::Interactive
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the interactive editing shell
    Shell,

    /// Canonicalize every entry to "0.0.0.0 host", sort and dedup, then save
    Clean {
        #[command(flatten)]
        review: ReviewArgs,
    },

    /// Remove repeated entries keeping order, then save
    Dedup {
        #[command(flatten)]
        review: ReviewArgs,
    },

    /// Remove whitelisted entries, then save
    Filter {
        #[command(flatten)]
        review: ReviewArgs,
    },

    /// Pick lines containing a keyword to remove, then save
    Remove {
        /// Keyword to search for (case-insensitive)
        keyword: String,

        #[command(flatten)]
        review: ReviewArgs,
    },

    /// Import a remote list by source name or URL, then save
    ImportUrl {
        /// Source name from the config, or an http(s) URL
        source: String,

        #[command(flatten)]
        review: ReviewArgs,
    },

    /// Import blocked hostnames from a DNSBL log file, then save
    ImportLog {
        /// Path to the log file
        path: PathBuf,

        #[command(flatten)]
        review: ReviewArgs,
    },

    /// Clean and write the hosts file, backing up its previous content
    Save {
        #[command(flatten)]
        review: ReviewArgs,
    },

    /// Revert the hosts file to its backup
    Restore {
        #[command(flatten)]
        review: ReviewArgs,
    },

    /// Show hosts file, backup and applied status
    Status,

    /// Flush the operating system DNS cache
    FlushDns,

    /// Manage the whitelist
    Whitelist {
        #[command(subcommand)]
        action: WhitelistAction,
    },

    /// Manage named blocklist sources
    Sources {
        #[command(subcommand)]
        action: SourcesAction,
    },

    /// Show version
    Version,
}

#[derive(Subcommand)]
pub enum WhitelistAction {
    /// Add a hostname to the whitelist
    Add {
        /// Hostname to add
        host: String,
    },
    /// Remove a hostname from the whitelist
    Del {
        /// Hostname to remove
        host: String,
    },
    /// List all whitelisted hostnames
    List,
    /// Append whitelist lines from a file or URL
    Import {
        /// Path to a file, or an http(s) URL
        from: String,
    },
}

#[derive(Subcommand)]
pub enum SourcesAction {
    /// Add a named source
    Add {
        /// Short name used with import-url
        name: String,
        /// http(s) URL of the list
        url: String,
    },
    /// Remove a named source
    Del {
        /// Name of the source
        name: String,
    },
    /// List configured sources
    List,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parses_help() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_version_command() {
        let cli = Cli::try_parse_from(["hostscrub", "version"]).unwrap();
        assert!(matches!(cli.command, Commands::Version));
    }

    #[test]
    fn test_cli_clean_defaults_to_interactive() {
        let cli = Cli::try_parse_from(["hostscrub", "clean"]).unwrap();
        match cli.command {
            Commands::Clean { review } => {
                assert_eq!(review.mode(), ReviewMode::Interactive);
            }
            _ => panic!("Expected Clean command"),
        }
    }

    #[test]
    fn test_cli_review_flags() {
        let cli = Cli::try_parse_from(["hostscrub", "dedup", "--yes"]).unwrap();
        match cli.command {
            Commands::Dedup { review } => assert_eq!(review.mode(), ReviewMode::AssumeYes),
            _ => panic!("Expected Dedup command"),
        }

        let cli = Cli::try_parse_from(["hostscrub", "save", "--dry-run"]).unwrap();
        match cli.command {
            Commands::Save { review } => assert_eq!(review.mode(), ReviewMode::DryRun),
            _ => panic!("Expected Save command"),
        }
    }

    #[test]
    fn test_cli_yes_conflicts_with_dry_run() {
        assert!(Cli::try_parse_from(["hostscrub", "clean", "--yes", "--dry-run"]).is_err());
    }

    #[test]
    fn test_cli_remove_command() {
        let cli = Cli::try_parse_from(["hostscrub", "remove", "doubleclick", "-y"]).unwrap();
        match cli.command {
            Commands::Remove { keyword, review } => {
                assert_eq!(keyword, "doubleclick");
                assert!(review.yes);
            }
            _ => panic!("Expected Remove command"),
        }
    }

    #[test]
    fn test_cli_remove_requires_keyword() {
        assert!(Cli::try_parse_from(["hostscrub", "remove"]).is_err());
    }

    #[test]
    fn test_cli_import_commands() {
        let cli = Cli::try_parse_from(["hostscrub", "import-url", "stevenblack"]).unwrap();
        match cli.command {
            Commands::ImportUrl { source, .. } => assert_eq!(source, "stevenblack"),
            _ => panic!("Expected ImportUrl command"),
        }

        let cli = Cli::try_parse_from(["hostscrub", "import-log", "/var/log/dnsbl.log"]).unwrap();
        match cli.command {
            Commands::ImportLog { path, .. } => {
                assert_eq!(path, PathBuf::from("/var/log/dnsbl.log"))
            }
            _ => panic!("Expected ImportLog command"),
        }
    }

    #[test]
    fn test_cli_whitelist_add() {
        let cli = Cli::try_parse_from(["hostscrub", "whitelist", "add", "example.com"]).unwrap();
        match cli.command {
            Commands::Whitelist {
                action: WhitelistAction::Add { host },
            } => {
                assert_eq!(host, "example.com");
            }
            _ => panic!("Expected Whitelist Add command"),
        }
    }

    #[test]
    fn test_cli_sources_add() {
        let cli = Cli::try_parse_from([
            "hostscrub",
            "sources",
            "add",
            "mylist",
            "https://example.com/hosts",
        ])
        .unwrap();
        match cli.command {
            Commands::Sources {
                action: SourcesAction::Add { name, url },
            } => {
                assert_eq!(name, "mylist");
                assert_eq!(url, "https://example.com/hosts");
            }
            _ => panic!("Expected Sources Add command"),
        }
    }

    #[test]
    fn test_cli_global_options() {
        let cli = Cli::try_parse_from([
            "hostscrub",
            "-q",
            "-v",
            "--config",
            "/custom/path.yaml",
            "status",
        ])
        .unwrap();
        assert!(cli.quiet);
        assert!(cli.verbose);
        assert_eq!(cli.config.to_str().unwrap(), "/custom/path.yaml");
    }
}
