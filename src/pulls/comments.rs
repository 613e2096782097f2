//! pulls::comments
//!
//! Conversation comments on pull requests.

use serde_json::json;
use tracing::instrument;

use super::types::Comment;
use super::{pr_id, repo_id};
use crate::client::GitHubClient;
use crate::error::GitError;
use crate::remote::RemoteRequest;

impl GitHubClient {
    /// Post a comment on the pull request at `pr_uri`.
    #[instrument(skip_all, fields(pr = %pr_uri))]
    pub async fn create_comment(&self, pr_uri: &str, body: &str) -> Result<Comment, GitError> {
        let id = pr_id(pr_uri)?;
        let repo = id.repository();
        self.send(RemoteRequest::post(
            repo.api_path(&format!("issues/{}/comments", id.number)),
            json!({ "body": body }),
        ))
        .await
        .map_err(|e| e.located(&format!("pulls/{}", id.number), &repo, "pull request"))
    }

    /// Replace the body of comment `comment_id` in the repository at
    /// `repo_uri`.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `comment_id` isn't a number.
    #[instrument(skip_all, fields(repo = %repo_uri, comment = %comment_id))]
    pub async fn update_comment(
        &self,
        repo_uri: &str,
        comment_id: &str,
        body: &str,
    ) -> Result<Comment, GitError> {
        let repo = repo_id(repo_uri)?;
        let id: u64 = comment_id.trim().parse().map_err(|_| {
            GitError::InvalidArgument(format!("comment id '{}' is not a number", comment_id))
        })?;

        self.send(RemoteRequest::patch(
            repo.api_path(&format!("issues/comments/{}", id)),
            json!({ "body": body }),
        ))
        .await
        .map_err(|e| e.located(&format!("comments/{}", id), &repo, "comment"))
    }
}
