//! gitremote - Remote Git commits, branches, and pull requests over the
//! GitHub API
//!
//! gitremote writes to a repository without a working copy. A multi-file
//! change becomes blobs, a tree, a commit and a ref update made directly
//! against the provider's object API, and pull requests are driven through
//! their whole lifecycle from the same client.
//!
//! # Architecture
//!
//! - [`uri`] - Repository and pull request URI parsing
//! - [`remote`] - The executor seam: HTTP transport and a recording mock
//! - [`auth`] - Token providers
//! - [`config`] - TOML configuration
//! - [`client`] - [`GitHubClient`], the handle every operation hangs off
//! - [`git`] - Blobs, trees, commits, branches, file reads
//! - [`pulls`] - Pull request lifecycle
//! - [`cli`] - The `gitremote` command line
//!
//! # Invariants
//!
//! 1. New trees are layered on a base tree
//! 2. Commits built here have exactly one parent
//! 3. Branch updates never force unless the caller asked for it
//! 4. Failures propagate; only existence checks turn not-found into `false`

pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod git;
pub mod pulls;
pub mod remote;
pub mod uri;

#[cfg(test)]
mod test_support;

pub use client::GitHubClient;
pub use config::ClientConfig;
pub use error::GitError;
pub use git::{CommitRecord, GitFile};
pub use pulls::{PullRequestStatus, PullRequestUpsert};
pub use uri::{parse_pr_uri, parse_repo_uri, PullRequestId, RepositoryId};
