//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! - `--debug`: Enable debug logging
//! - `--api-base <url>`: Override the configured API base
//! - `--config <path>`: Read configuration from this file

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::pulls::PullRequestStatus;

/// gitremote - Commit, branch, and manage pull requests without a clone
#[derive(Parser, Debug)]
#[command(name = "gitremote")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// API base URL, e.g. https://github.example.com/api/v3
    #[arg(long, global = true, value_name = "URL")]
    pub api_base: Option<String>,

    /// Configuration file (default: $GITREMOTE_CONFIG or the user config dir)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Commit local files to a branch in a single commit
    #[command(
        name = "commit",
        long_about = "Commit local files to a remote branch in a single commit.\n\n\
            Each --file maps a repository path to a local file. Files that are \
            valid UTF-8 are sent as text, anything else as base64. The branch \
            must already exist; it is advanced without forcing.",
        after_help = "\
EXAMPLES:
    # Update two files on main
    gitremote commit https://github.com/octo/app -b main -m 'Bump versions' \\
        --file eng/Versions.props=./Versions.props \\
        --file global.json=./global.json

    # Remove a file
    gitremote commit https://github.com/octo/app -b main -m 'Drop old config' \\
        --delete old/config.yml"
    )]
    Commit {
        /// Repository URI
        repo: String,

        /// Branch to commit to
        #[arg(short, long)]
        branch: String,

        /// Commit message
        #[arg(short, long)]
        message: String,

        /// File to write, as REPO_PATH=LOCAL_PATH
        #[arg(long = "file", value_name = "REPO_PATH=LOCAL_PATH")]
        files: Vec<String>,

        /// Repository path to delete
        #[arg(long = "delete", value_name = "REPO_PATH")]
        deletions: Vec<String>,
    },

    /// Create a branch, or reset an existing one, at another branch's head
    #[command(name = "ensure-branch")]
    EnsureBranch {
        /// Repository URI
        repo: String,

        /// Branch to create or reset
        name: String,

        /// Branch whose head the new branch points at
        #[arg(long, default_value = "main")]
        base: String,
    },

    /// List files under a directory at a commit
    #[command(name = "files")]
    Files {
        /// Repository URI
        repo: String,

        /// Commit sha
        commit: String,

        /// Directory within the repository (default: root)
        #[arg(long, default_value = "")]
        dir: String,
    },

    /// Print file contents at a ref
    #[command(name = "show")]
    Show {
        /// Repository URI
        repo: String,

        /// Paths to print
        #[arg(required = true)]
        paths: Vec<String>,

        /// Branch or commit sha
        #[arg(long = "ref", default_value = "main")]
        reference: String,
    },

    /// Pull request operations
    #[command(name = "pr", subcommand)]
    Pr(PrCommand),

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        after_help = "\
EXAMPLES:
    # Bash
    gitremote completion bash > ~/.local/share/bash-completion/completions/gitremote

    # Zsh
    gitremote completion zsh > ~/.zfunc/_gitremote"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Pull request subcommands.
#[derive(Subcommand, Debug)]
pub enum PrCommand {
    /// Open a pull request
    Create {
        /// Repository URI
        repo: String,

        /// Branch with the changes
        #[arg(long)]
        head: String,

        /// Branch to merge into
        #[arg(long, default_value = "main")]
        base: String,

        /// Title (default: configured tag)
        #[arg(long)]
        title: Option<String>,

        /// Description (default: configured tag)
        #[arg(long)]
        description: Option<String>,
    },

    /// Change the title, description, or base of a pull request
    Update {
        /// Pull request API URI
        pr: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// New base branch
        #[arg(long)]
        base: Option<String>,
    },

    /// Print open, closed, merged, or none
    Status {
        /// Pull request API URI
        pr: String,
    },

    /// Print CI statuses of the latest commit
    Checks {
        /// Pull request API URI
        pr: String,
    },

    /// Print reviews
    Reviews {
        /// Pull request API URI
        pr: String,
    },

    /// Merge a pull request
    Merge {
        /// Pull request API URI
        pr: String,

        /// Squash instead of creating a merge commit
        #[arg(long)]
        squash: bool,

        /// Delete the head branch after merging
        #[arg(long)]
        delete_branch: bool,

        /// Only merge if the head is still at this sha
        #[arg(long)]
        sha: Option<String>,

        /// Merge commit message
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Find pull requests by head branch and status
    Search {
        /// Repository URI
        repo: String,

        /// Head branch
        #[arg(long)]
        branch: String,

        #[arg(long, value_enum, default_value = "open")]
        status: StatusArg,

        #[arg(long)]
        keyword: Option<String>,

        #[arg(long)]
        author: Option<String>,
    },

    /// Comment on a pull request
    Comment {
        /// Pull request API URI
        pr: String,

        /// Comment text
        body: String,
    },

    /// Replace the text of an existing comment
    EditComment {
        /// Repository URI
        repo: String,

        /// Comment id
        id: String,

        /// New comment text
        body: String,
    },
}

/// Searchable pull request states.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusArg {
    Open,
    Closed,
    Merged,
}

impl From<StatusArg> for PullRequestStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Open => PullRequestStatus::Open,
            StatusArg::Closed => PullRequestStatus::Closed,
            StatusArg::Merged => PullRequestStatus::Merged,
        }
    }
}

/// Supported shells for completion
#[derive(ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_commit() {
        let cli = Cli::try_parse_from([
            "gitremote",
            "commit",
            "https://github.com/o/r",
            "-b",
            "main",
            "-m",
            "msg",
            "--file",
            "a.txt=./a.txt",
            "--delete",
            "b.txt",
        ])
        .unwrap();
        match cli.command {
            Command::Commit {
                files, deletions, ..
            } => {
                assert_eq!(files, vec!["a.txt=./a.txt".to_string()]);
                assert_eq!(deletions, vec!["b.txt".to_string()]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "gitremote",
            "pr",
            "status",
            "https://api.github.com/repos/o/r/pulls/1",
            "--debug",
            "--api-base",
            "https://ghe.local/api/v3",
        ])
        .unwrap();
        assert!(cli.debug);
        assert_eq!(cli.api_base.as_deref(), Some("https://ghe.local/api/v3"));
    }

    #[test]
    fn search_status_defaults_to_open() {
        let cli = Cli::try_parse_from([
            "gitremote",
            "pr",
            "search",
            "https://github.com/o/r",
            "--branch",
            "feature",
        ])
        .unwrap();
        match cli.command {
            Command::Pr(PrCommand::Search { status, .. }) => {
                assert_eq!(PullRequestStatus::from(status), PullRequestStatus::Open)
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn search_rejects_none_status() {
        assert!(Cli::try_parse_from([
            "gitremote",
            "pr",
            "search",
            "https://github.com/o/r",
            "--branch",
            "f",
            "--status",
            "none",
        ])
        .is_err());
    }
}
