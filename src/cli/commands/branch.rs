//! cli::commands::branch

use anyhow::Result;

use super::repository;
use crate::cli::Context;

/// Point `name` at the head of `base`, creating the branch if needed.
pub fn ensure_branch(ctx: &Context, repo: &str, name: &str, base: &str) -> Result<()> {
    let repo = repository(repo)?;
    let client = ctx.client()?;

    let rt = tokio::runtime::Runtime::new()?;
    let branch = rt.block_on(client.ensure_branch(&repo, name, base))?;

    let action = if branch.force { "Reset" } else { "Created" };
    println!("{} {} at {}", action, branch.ref_name(), branch.target_sha);
    Ok(())
}
