//! error
//!
//! Domain errors surfaced by engine operations.
//!
//! # Propagation
//!
//! Only two conversions swallow a failure: existence checks turn a
//! not-found into `false`, and unrecognized check states become
//! `CheckState::Unknown`. Everything else reaches the caller.

use thiserror::Error;

use crate::remote::RemoteError;
use crate::uri::RepositoryId;

/// Errors from engine operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// A file, tree, branch, or pull request is absent.
    #[error("'{path}' not found in {repo} at '{reference}'")]
    NotFound {
        /// Path or ref name that was looked up
        path: String,
        /// Repository, as `owner/repo`
        repo: String,
        /// Commit sha or branch the lookup was made against
        reference: String,
    },

    /// The provider returned a result the engine cannot use, such as a
    /// truncated recursive tree.
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// Malformed input supplied by the caller.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The response didn't have the expected shape.
    #[error("failed to decode response of {context}: {message}")]
    Decode { context: String, message: String },

    /// Any other provider or transport failure.
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

impl GitError {
    pub fn not_found(
        path: impl Into<String>,
        repo: &RepositoryId,
        reference: impl Into<String>,
    ) -> Self {
        GitError::NotFound {
            path: path.into(),
            repo: repo.to_string(),
            reference: reference.into(),
        }
    }

    /// Whether this error reports an absent resource.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            GitError::NotFound { .. } | GitError::Remote(RemoteError::NotFound(_))
        )
    }

    /// Attach lookup context to a bare remote not-found.
    pub(crate) fn located(self, path: &str, repo: &RepositoryId, reference: &str) -> Self {
        match self {
            GitError::Remote(RemoteError::NotFound(_)) => GitError::not_found(path, repo, reference),
            other => other,
        }
    }
}
