//! pulls::lifecycle
//!
//! Create, update, read, and merge pull requests.

use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{info, instrument, warn};

use super::types::{
    BranchDeletion, MergeOptions, MergeOutcome, PullRequest, PullRequestStatus, PullRequestUpsert,
    UpsertMethod,
};
use super::{pr_id, repo_id};
use crate::client::GitHubClient;
use crate::error::GitError;
use crate::git::CommitRecord;
use crate::remote::{RemoteError, RemoteRequest};
use crate::uri::{PullRequestId, RepositoryId};

impl GitHubClient {
    /// Create or update a pull request and return its API URI.
    ///
    /// With [`UpsertMethod::Create`] `uri` names the repository; a missing
    /// title or description falls back to the configured default. With
    /// [`UpsertMethod::Update`] `uri` names the pull request and only the
    /// supplied fields are changed.
    #[instrument(skip_all, fields(uri = %uri, method = ?upsert.method))]
    pub async fn create_or_update_pull_request(
        &self,
        uri: &str,
        upsert: &PullRequestUpsert,
    ) -> Result<String, GitError> {
        let id = match upsert.method {
            UpsertMethod::Create => self.create_pull_request(&repo_id(uri)?, upsert).await?,
            UpsertMethod::Update => {
                let id = pr_id(uri)?;
                self.update_pull_request(&id, upsert).await?;
                id
            }
        };
        Ok(id.api_url(self.config().api_base()))
    }

    /// Open a pull request from `head_branch` into `base_branch`.
    pub async fn create_pull_request(
        &self,
        repo: &RepositoryId,
        upsert: &PullRequestUpsert,
    ) -> Result<PullRequestId, GitError> {
        let title = upsert
            .title
            .clone()
            .unwrap_or_else(|| self.config().default_pr_title().to_string());
        let body = upsert
            .description
            .clone()
            .unwrap_or_else(|| self.config().default_pr_description().to_string());

        let created: NumberOnly = self
            .send(RemoteRequest::post(
                repo.api_path("pulls"),
                json!({
                    "title": title,
                    "body": body,
                    "head": upsert.head_branch,
                    "base": upsert.base_branch,
                }),
            ))
            .await?;

        info!(number = created.number, "created pull request");
        Ok(PullRequestId::new(
            repo.owner.clone(),
            repo.repo.clone(),
            created.number,
        ))
    }

    /// Change the title, description, or base branch of a pull request.
    ///
    /// Fields left as `None` (and an empty base branch) are not sent.
    pub async fn update_pull_request(
        &self,
        pr: &PullRequestId,
        upsert: &PullRequestUpsert,
    ) -> Result<(), GitError> {
        let mut patch = Map::new();
        if let Some(title) = &upsert.title {
            patch.insert("title".into(), Value::from(title.as_str()));
        }
        if let Some(description) = &upsert.description {
            patch.insert("body".into(), Value::from(description.as_str()));
        }
        if !upsert.base_branch.is_empty() {
            patch.insert("base".into(), Value::from(upsert.base_branch.as_str()));
        }

        let repo = pr.repository();
        self.send_unit(RemoteRequest::patch(
            repo.api_path(&format!("pulls/{}", pr.number)),
            Value::Object(patch),
        ))
        .await
        .map_err(|e| e.located(&format!("pulls/{}", pr.number), &repo, "pull request"))
    }

    /// Read a pull request.
    #[instrument(skip_all, fields(pr = %pr))]
    pub async fn get_pull_request_by_id(&self, pr: &PullRequestId) -> Result<PullRequest, GitError> {
        let repo = pr.repository();
        self.send(RemoteRequest::get(repo.api_path(&format!("pulls/{}", pr.number))))
            .await
            .map_err(|e| e.located(&format!("pulls/{}", pr.number), &repo, "pull request"))
    }

    /// Read the pull request at `pr_uri`.
    pub async fn get_pull_request(&self, pr_uri: &str) -> Result<PullRequest, GitError> {
        self.get_pull_request_by_id(&pr_id(pr_uri)?).await
    }

    /// Classify the pull request at `pr_uri`.
    pub async fn pull_request_status(&self, pr_uri: &str) -> Result<PullRequestStatus, GitError> {
        let id = pr_id(pr_uri)?;
        let repo = id.repository();
        let value: Value = self
            .send(RemoteRequest::get(repo.api_path(&format!("pulls/{}", id.number))))
            .await
            .map_err(|e| e.located(&format!("pulls/{}", id.number), &repo, "pull request"))?;
        Ok(PullRequestStatus::from_provider(
            value.get("state").and_then(Value::as_str),
            value.get("merged").and_then(merged_flag),
        ))
    }

    /// Commits of a pull request, oldest first.
    ///
    /// Only the first page (100 commits) is read.
    pub async fn pull_request_commits(&self, pr_uri: &str) -> Result<Vec<CommitRecord>, GitError> {
        let id = pr_id(pr_uri)?;
        self.pull_request_commits_by_id(&id).await
    }

    pub(crate) async fn pull_request_commits_by_id(
        &self,
        pr: &PullRequestId,
    ) -> Result<Vec<CommitRecord>, GitError> {
        let repo = pr.repository();
        let commits: Vec<PullCommit> = self
            .send(
                RemoteRequest::get(repo.api_path(&format!("pulls/{}/commits", pr.number)))
                    .with_query("per_page", "100"),
            )
            .await
            .map_err(|e| e.located(&format!("pulls/{}", pr.number), &repo, "pull request"))?;
        Ok(commits.into_iter().map(CommitRecord::from).collect())
    }

    /// Merge a pull request and optionally delete its head branch.
    ///
    /// A failed branch deletion after a successful merge is reported in
    /// [`MergeOutcome::branch_deletion`]; the merge itself is not undone
    /// and the call still succeeds.
    ///
    /// # Errors
    ///
    /// A merge the provider declines (`merged: false`) is reported as
    /// `RemoteError::ApiError` with status 405.
    #[instrument(skip_all, fields(pr = %pr_uri, squash = options.squash_merge))]
    pub async fn merge_pull_request(
        &self,
        pr_uri: &str,
        options: &MergeOptions,
    ) -> Result<MergeOutcome, GitError> {
        let id = pr_id(pr_uri)?;
        let repo = id.repository();

        let head_branch = if options.delete_source_branch {
            Some(self.get_pull_request_by_id(&id).await?.head.name)
        } else {
            None
        };

        let mut body = json!({ "merge_method": options.merge_method() });
        if let Some(sha) = &options.commit_to_merge {
            body["sha"] = Value::from(sha.as_str());
        }
        if let Some(message) = &options.commit_message {
            body["commit_message"] = Value::from(message.as_str());
        }

        let merged: MergeResponse = self
            .send(RemoteRequest::put(
                repo.api_path(&format!("pulls/{}/merge", id.number)),
                body,
            ))
            .await?;
        if !merged.merged {
            return Err(RemoteError::ApiError {
                status: 405,
                message: merged
                    .message
                    .unwrap_or_else(|| "Pull request is not mergeable".to_string()),
            }
            .into());
        }
        let sha = merged.sha.unwrap_or_default();
        info!(sha = %sha, "merged pull request");

        let branch_deletion = match head_branch {
            None => BranchDeletion::NotRequested,
            Some(branch) => match self.delete_branch(&repo, &branch).await {
                Ok(()) => BranchDeletion::Deleted(branch),
                Err(e) => {
                    warn!(branch = %branch, error = %e, "merged but failed to delete head branch");
                    BranchDeletion::Failed {
                        branch,
                        reason: e.to_string(),
                    }
                }
            },
        };

        Ok(MergeOutcome {
            sha,
            branch_deletion,
        })
    }
}

// --------------------------------------------------------------------------
// API Response Types
// --------------------------------------------------------------------------

#[derive(Deserialize)]
struct NumberOnly {
    number: u64,
}

/// `merged` as a boolean; some proxies report it as `"true"`/`"false"`.
fn merged_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::String(text) => text.trim().to_ascii_lowercase().parse().ok(),
        _ => None,
    }
}

#[derive(Deserialize)]
struct MergeResponse {
    #[serde(default)]
    merged: bool,
    sha: Option<String>,
    message: Option<String>,
}

#[derive(Deserialize)]
struct PullCommit {
    sha: String,
    commit: PullCommitDetail,
    #[serde(default)]
    parents: Vec<ShaRef>,
}

#[derive(Deserialize)]
struct PullCommitDetail {
    tree: ShaRef,
}

#[derive(Deserialize)]
struct ShaRef {
    sha: String,
}

impl From<PullCommit> for CommitRecord {
    fn from(commit: PullCommit) -> Self {
        CommitRecord {
            sha: commit.sha,
            tree_sha: commit.commit.tree.sha,
            parent_shas: commit.parents.into_iter().map(|p| p.sha).collect(),
        }
    }
}
