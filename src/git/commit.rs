//! git::commit
//!
//! Commit creation and branch ref management.
//!
//! # Design
//!
//! [`GitHubClient::commit_and_push`] spans five sequential round-trips:
//!
//! 1. read the branch head
//! 2. read that commit's tree
//! 3. build a new tree (blobs + tree)
//! 4. create a commit with the old head as its only parent
//! 5. move the branch ref to the new commit
//!
//! The sequence is not transactional. Blobs and trees written before a
//! failure are orphaned but harmless. A failure at step 5 leaves the branch
//! unchanged; callers retry the whole sequence because the head may have
//! moved in the meantime.

use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, instrument};

use super::types::{BranchRef, CommitRecord, GitFile};
use crate::client::GitHubClient;
use crate::error::GitError;
use crate::remote::RemoteRequest;
use crate::uri::RepositoryId;

impl GitHubClient {
    /// Read a commit.
    #[instrument(skip_all, fields(repo = %repo, sha = %sha))]
    pub async fn get_commit(&self, repo: &RepositoryId, sha: &str) -> Result<CommitRecord, GitError> {
        let commit: GitHubCommit = self
            .send(RemoteRequest::get(repo.api_path(&format!("git/commits/{}", sha))))
            .await
            .map_err(|e| e.located(sha, repo, sha))?;
        Ok(commit.into())
    }

    /// Sha of the commit a branch points at.
    #[instrument(skip_all, fields(repo = %repo, branch = %branch))]
    pub async fn latest_commit_sha(
        &self,
        repo: &RepositoryId,
        branch: &str,
    ) -> Result<String, GitError> {
        let git_ref: GitHubRef = self
            .send(RemoteRequest::get(repo.api_path(&format!("git/ref/heads/{}", branch))))
            .await
            .map_err(|e| e.located(&format!("refs/heads/{}", branch), repo, branch))?;
        Ok(git_ref.object.sha)
    }

    /// Whether a branch exists. A 404 is `false`; other failures propagate.
    #[instrument(skip_all, fields(repo = %repo, branch = %branch))]
    pub async fn branch_exists(&self, repo: &RepositoryId, branch: &str) -> Result<bool, GitError> {
        match self.latest_commit_sha(repo, branch).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Point `name` at the head of `base_branch`, creating it if needed.
    ///
    /// An existing branch is force-updated; a missing one is created. Any
    /// failure other than not-found while checking existence propagates.
    #[instrument(skip_all, fields(repo = %repo, branch = %name, base = %base_branch))]
    pub async fn ensure_branch(
        &self,
        repo: &RepositoryId,
        name: &str,
        base_branch: &str,
    ) -> Result<BranchRef, GitError> {
        let base_sha = self.latest_commit_sha(repo, base_branch).await?;

        let existing = self
            .send::<GitHubRef>(RemoteRequest::get(
                repo.api_path(&format!("git/ref/heads/{}", name)),
            ))
            .await;

        match existing {
            Ok(_) => {
                debug!("branch exists, force-updating");
                self.update_ref(repo, name, &base_sha, true).await
            }
            Err(e) if e.is_not_found() => {
                debug!("branch missing, creating");
                self.create_ref(repo, name, &base_sha).await
            }
            Err(e) => Err(e),
        }
    }

    /// Create `refs/heads/{name}` at `sha`.
    pub async fn create_ref(
        &self,
        repo: &RepositoryId,
        name: &str,
        sha: &str,
    ) -> Result<BranchRef, GitError> {
        let created: GitHubRef = self
            .send(RemoteRequest::post(
                repo.api_path("git/refs"),
                json!({ "ref": format!("refs/heads/{}", name), "sha": sha }),
            ))
            .await?;
        Ok(BranchRef {
            name: name.to_string(),
            target_sha: created.object.sha,
            force: false,
        })
    }

    /// Move `refs/heads/{name}` to `sha`.
    ///
    /// Without `force` the provider rejects non-fast-forward moves.
    pub async fn update_ref(
        &self,
        repo: &RepositoryId,
        name: &str,
        sha: &str,
        force: bool,
    ) -> Result<BranchRef, GitError> {
        let updated: GitHubRef = self
            .send(RemoteRequest::patch(
                repo.api_path(&format!("git/refs/heads/{}", name)),
                json!({ "sha": sha, "force": force }),
            ))
            .await
            .map_err(|e| e.located(&format!("refs/heads/{}", name), repo, name))?;
        Ok(BranchRef {
            name: name.to_string(),
            target_sha: updated.object.sha,
            force,
        })
    }

    /// Delete a branch ref.
    #[instrument(skip_all, fields(repo = %repo, branch = %name))]
    pub async fn delete_branch(&self, repo: &RepositoryId, name: &str) -> Result<(), GitError> {
        self.send_unit(RemoteRequest::delete(
            repo.api_path(&format!("git/refs/heads/{}", name)),
        ))
        .await
        .map_err(|e| e.located(&format!("refs/heads/{}", name), repo, name))
    }

    /// Create a commit of `tree_sha` with a single parent.
    pub async fn create_commit(
        &self,
        repo: &RepositoryId,
        message: &str,
        tree_sha: &str,
        parent_sha: &str,
    ) -> Result<CommitRecord, GitError> {
        let commit: GitHubCommit = self
            .send(RemoteRequest::post(
                repo.api_path("git/commits"),
                json!({ "message": message, "tree": tree_sha, "parents": [parent_sha] }),
            ))
            .await?;
        Ok(commit.into())
    }

    /// Commit `files` on top of `branch` and advance the branch.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `files` is empty
    /// - `NotFound` if the branch doesn't exist
    /// - any failure of the five underlying calls, unchanged; nothing after
    ///   the failing step is attempted
    #[instrument(skip_all, fields(repo = %repo, branch = %branch, files = files.len()))]
    pub async fn commit_and_push(
        &self,
        repo: &RepositoryId,
        branch: &str,
        files: &[GitFile],
        message: &str,
    ) -> Result<CommitRecord, GitError> {
        if files.is_empty() {
            return Err(GitError::InvalidArgument("no files to commit".into()));
        }

        let head_sha = self.latest_commit_sha(repo, branch).await?;
        let head = self.get_commit(repo, &head_sha).await?;
        let tree_sha = self.build_commit_tree(repo, files, &head.tree_sha).await?;
        let commit = self.create_commit(repo, message, &tree_sha, &head_sha).await?;
        self.update_ref(repo, branch, &commit.sha, false).await?;

        info!(commit = %commit.sha, parent = %head_sha, "pushed commit");
        Ok(commit)
    }
}

// --------------------------------------------------------------------------
// API Response Types
// --------------------------------------------------------------------------

/// GitHub git ref response format.
#[derive(Deserialize)]
struct GitHubRef {
    object: GitHubObject,
}

#[derive(Deserialize)]
struct GitHubObject {
    sha: String,
}

/// GitHub git commit response format.
#[derive(Deserialize)]
struct GitHubCommit {
    sha: String,
    tree: GitHubObject,
    #[serde(default)]
    parents: Vec<GitHubObject>,
}

impl From<GitHubCommit> for CommitRecord {
    fn from(commit: GitHubCommit) -> Self {
        CommitRecord {
            sha: commit.sha,
            tree_sha: commit.tree.sha,
            parent_shas: commit.parents.into_iter().map(|p| p.sha).collect(),
        }
    }
}
