//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Async Commands
//!
//! Every command except `completion` talks to the API. Each handler is a
//! sync wrapper that builds a tokio runtime and blocks on its async body.

mod branch;
mod commit;
mod completion;
mod files;
mod pr;

pub use branch::ensure_branch;
pub use commit::{commit, parse_file_arg};
pub use completion::completion;
pub use files::{files, show};
pub use pr::pr;

use anyhow::Result;

use crate::cli::args::Command;
use crate::cli::Context;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Commit {
            repo,
            branch,
            message,
            files,
            deletions,
        } => commit::commit(ctx, &repo, &branch, &message, &files, &deletions),
        Command::EnsureBranch { repo, name, base } => {
            branch::ensure_branch(ctx, &repo, &name, &base)
        }
        Command::Files { repo, commit, dir } => files::files(ctx, &repo, &commit, &dir),
        Command::Show {
            repo,
            paths,
            reference,
        } => files::show(ctx, &repo, &paths, &reference),
        Command::Pr(command) => pr::pr(ctx, command),
        Command::Completion { shell } => completion::completion(shell),
    }
}

/// Parse a repository URI argument.
fn repository(uri: &str) -> Result<crate::uri::RepositoryId> {
    crate::uri::parse_repo_uri(uri)
        .ok_or_else(|| anyhow::anyhow!("'{}' is not a repository URI (https://host/owner/repo)", uri))
}
