//! cli::commands::commit
//!
//! Commit local files to a remote branch.
//!
//! # Example
//!
//! ```bash
//! gitremote commit https://github.com/octo/app -b main -m 'Bump' \
//!     --file eng/Versions.props=./Versions.props
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _, Result};

use super::repository;
use crate::cli::Context;
use crate::git::GitFile;

/// Run the commit command.
pub fn commit(
    ctx: &Context,
    repo: &str,
    branch: &str,
    message: &str,
    files: &[String],
    deletions: &[String],
) -> Result<()> {
    let repo = repository(repo)?;
    let changes = collect_changes(files, deletions)?;
    if changes.is_empty() {
        bail!("Nothing to commit. Pass at least one --file or --delete.");
    }

    let client = ctx.client()?;
    let rt = tokio::runtime::Runtime::new()?;
    let record = rt.block_on(client.commit_and_push(&repo, branch, &changes, message))?;

    println!(
        "Committed {} file(s) to {} as {}",
        changes.len(),
        branch,
        record.sha
    );
    Ok(())
}

/// Split a `REPO_PATH=LOCAL_PATH` argument.
pub fn parse_file_arg(arg: &str) -> Result<(String, PathBuf)> {
    match arg.split_once('=') {
        Some((repo_path, local)) if !repo_path.is_empty() && !local.is_empty() => Ok((
            repo_path.trim_start_matches('/').to_string(),
            PathBuf::from(local),
        )),
        _ => bail!("Invalid --file '{}'; expected REPO_PATH=LOCAL_PATH", arg),
    }
}

fn collect_changes(files: &[String], deletions: &[String]) -> Result<Vec<GitFile>> {
    let mut changes = Vec::with_capacity(files.len() + deletions.len());
    for arg in files {
        let (repo_path, local) = parse_file_arg(arg)?;
        changes.push(read_local(&repo_path, &local)?);
    }
    changes.extend(deletions.iter().map(|p| GitFile::deleted(p.trim_start_matches('/'))));
    Ok(changes)
}

/// Text files go over the wire as-is, anything else as base64.
fn read_local(repo_path: &str, local: &Path) -> Result<GitFile> {
    let bytes =
        std::fs::read(local).with_context(|| format!("Failed to read {}", local.display()))?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => GitFile::text(repo_path, text),
        Err(e) => GitFile::binary(repo_path, e.as_bytes()),
    })
}
