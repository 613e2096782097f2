//! cli::commands::pr
//!
//! Pull request subcommands.
//!
//! # Example
//!
//! ```bash
//! gitremote pr create https://github.com/octo/app --head bump --base main
//! gitremote pr checks https://api.github.com/repos/octo/app/pulls/12
//! gitremote pr merge https://api.github.com/repos/octo/app/pulls/12 --squash --delete-branch
//! ```

use anyhow::Result;

use crate::cli::args::PrCommand;
use crate::cli::Context;
use crate::client::GitHubClient;
use crate::pulls::{BranchDeletion, MergeOptions, PullRequestUpsert};

/// Run a pull request subcommand.
pub fn pr(ctx: &Context, command: PrCommand) -> Result<()> {
    let client = ctx.client()?;
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(pr_async(&client, command))
}

async fn pr_async(client: &GitHubClient, command: PrCommand) -> Result<()> {
    match command {
        PrCommand::Create {
            repo,
            head,
            base,
            title,
            description,
        } => {
            let upsert = PullRequestUpsert {
                title,
                description,
                ..PullRequestUpsert::create(head, base)
            };
            let uri = client.create_or_update_pull_request(&repo, &upsert).await?;
            println!("{}", uri);
        }
        PrCommand::Update {
            pr,
            title,
            description,
            base,
        } => {
            let upsert = PullRequestUpsert {
                title,
                description,
                ..PullRequestUpsert::update("", base.unwrap_or_default())
            };
            let uri = client.create_or_update_pull_request(&pr, &upsert).await?;
            println!("Updated {}", uri);
        }
        PrCommand::Status { pr } => {
            println!("{}", client.pull_request_status(&pr).await?);
        }
        PrCommand::Checks { pr } => {
            let checks = client.pull_request_checks(&pr).await?;
            if checks.is_empty() {
                println!("No checks reported.");
            }
            for check in checks {
                let state = format!("{:?}", check.state).to_lowercase();
                match check.target_url {
                    Some(url) => println!("{:<8} {} ({})", state, check.context, url),
                    None => println!("{:<8} {}", state, check.context),
                }
            }
        }
        PrCommand::Reviews { pr } => {
            for review in client.pull_request_reviews(&pr).await? {
                println!(
                    "{:?} by {}",
                    review.state,
                    review.user.as_deref().unwrap_or("(deleted user)")
                );
            }
        }
        PrCommand::Merge {
            pr,
            squash,
            delete_branch,
            sha,
            message,
        } => {
            let options = MergeOptions {
                commit_to_merge: sha,
                squash_merge: squash,
                delete_source_branch: delete_branch,
                commit_message: message,
            };
            let outcome = client.merge_pull_request(&pr, &options).await?;
            println!("Merged as {}", outcome.sha);
            match outcome.branch_deletion {
                BranchDeletion::NotRequested => {}
                BranchDeletion::Deleted(branch) => println!("Deleted branch {}", branch),
                BranchDeletion::Failed { branch, reason } => {
                    eprintln!("Warning: could not delete branch {}: {}", branch, reason)
                }
            }
        }
        PrCommand::Search {
            repo,
            branch,
            status,
            keyword,
            author,
        } => {
            let numbers = client
                .search_pull_requests(
                    &repo,
                    &branch,
                    status.into(),
                    keyword.as_deref(),
                    author.as_deref(),
                )
                .await?;
            for number in numbers {
                println!("{}", number);
            }
        }
        PrCommand::Comment { pr, body } => {
            let comment = client.create_comment(&pr, &body).await?;
            println!("Created comment {}", comment.id);
        }
        PrCommand::EditComment { repo, id, body } => {
            let comment = client.update_comment(&repo, &id, &body).await?;
            println!("Updated comment {}", comment.id);
        }
    }
    Ok(())
}
