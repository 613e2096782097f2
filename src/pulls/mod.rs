//! pulls
//!
//! Pull request lifecycle: create, update, read, search, checks,
//! comments, reviews, and merge.
//!
//! Operations take the pull request or repository as a URI, resolved with
//! [`crate::uri`]. A URI that doesn't parse is `GitError::InvalidArgument`.
//!
//! # State model
//!
//! ```text
//!   create ──► Open ──merge──► Merged
//!               │
//!               └──close──► Closed
//! ```
//!
//! Anything the provider reports outside these states is
//! [`PullRequestStatus::None`].

pub mod checks;
pub mod comments;
pub mod lifecycle;
pub mod reviews;
pub mod search;
mod types;

pub use search::build_search_query;
pub use types::*;

use crate::error::GitError;
use crate::uri::{parse_pr_uri, parse_repo_uri, PullRequestId, RepositoryId};

fn repo_id(uri: &str) -> Result<RepositoryId, GitError> {
    parse_repo_uri(uri)
        .ok_or_else(|| GitError::InvalidArgument(format!("not a repository URI: '{}'", uri)))
}

fn pr_id(uri: &str) -> Result<PullRequestId, GitError> {
    parse_pr_uri(uri)
        .ok_or_else(|| GitError::InvalidArgument(format!("not a pull request URI: '{}'", uri)))
}
