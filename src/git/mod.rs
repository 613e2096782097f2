//! git
//!
//! Remote Git object graph operations.
//!
//! # Architecture
//!
//! Everything here runs against the provider's Git Data API; there is no
//! local repository. Operations are inherent methods on
//! [`GitHubClient`](crate::client::GitHubClient), grouped by concern:
//!
//! - [`tree`]: blob upload, tree construction, recursive tree reads
//! - [`commit`]: commits, branch heads, branch creation and deletion
//! - [`files`]: single-file reads and concurrent multi-file reads
//!
//! # Invariants
//!
//! - New trees always reference a base tree
//! - Commits created here have exactly one parent
//! - A truncated recursive listing is an error, never a partial result

pub mod commit;
pub mod files;
pub mod tree;
mod types;

pub use tree::BlobContent;
pub use types::*;
