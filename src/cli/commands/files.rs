//! cli::commands::files

use anyhow::Result;

use super::repository;
use crate::cli::Context;
use crate::git::ContentEncoding;

/// List every file under `dir` at `commit`.
pub fn files(ctx: &Context, repo: &str, commit: &str, dir: &str) -> Result<()> {
    let repo = repository(repo)?;
    let client = ctx.client()?;

    let rt = tokio::runtime::Runtime::new()?;
    let files = rt.block_on(client.files_at_path(&repo, commit, dir))?;

    for file in files {
        println!("{} {}", file.mode, file.path);
    }
    Ok(())
}

/// Print files at `reference`. Binary files are printed as base64.
pub fn show(ctx: &Context, repo: &str, paths: &[String], reference: &str) -> Result<()> {
    let repo = repository(repo)?;
    let client = ctx.client()?;

    let rt = tokio::runtime::Runtime::new()?;
    let files = rt.block_on(client.files_for_commit(&repo, reference, paths))?;

    let many = files.len() > 1;
    for file in files {
        if many {
            println!("==> {} <==", file.path);
        }
        match file.encoding {
            ContentEncoding::Utf8 => print!("{}", file.content),
            ContentEncoding::Base64 => println!("{}", file.content),
        }
    }
    Ok(())
}
