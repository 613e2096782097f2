//! pulls::search
//!
//! Pull request search by head branch and status.

use serde::Deserialize;
use tracing::{debug, instrument};

use super::repo_id;
use super::types::PullRequestStatus;
use crate::client::GitHubClient;
use crate::error::GitError;
use crate::remote::RemoteRequest;
use crate::uri::RepositoryId;

impl GitHubClient {
    /// Numbers of pull requests from `branch` in `status`.
    ///
    /// `keyword` and `author` narrow the search when given.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for an unparseable `repo_uri` or for
    /// [`PullRequestStatus::None`], which has no search qualifier.
    #[instrument(skip_all, fields(repo = %repo_uri, branch = %branch, status = %status))]
    pub async fn search_pull_requests(
        &self,
        repo_uri: &str,
        branch: &str,
        status: PullRequestStatus,
        keyword: Option<&str>,
        author: Option<&str>,
    ) -> Result<Vec<u64>, GitError> {
        let repo = repo_id(repo_uri)?;
        let query = build_search_query(&repo, branch, status, keyword, author)?;
        debug!(query = %query, "searching pull requests");

        let results: SearchResults = self
            .send(RemoteRequest::get("search/issues").with_query("q", query))
            .await?;
        Ok(results.items.into_iter().map(|item| item.number).collect())
    }
}

/// Search query string, terms separated by spaces.
///
/// The string is unencoded; it is form-encoded when sent, so the spaces go
/// out as `+` and characters such as `#` or `&` inside a keyword stay part
/// of the query.
pub fn build_search_query(
    repo: &RepositoryId,
    branch: &str,
    status: PullRequestStatus,
    keyword: Option<&str>,
    author: Option<&str>,
) -> Result<String, GitError> {
    let state = status.search_token().ok_or_else(|| {
        GitError::InvalidArgument("cannot search for pull requests with status 'none'".into())
    })?;

    let mut terms = Vec::with_capacity(6);
    if let Some(keyword) = keyword.filter(|k| !k.is_empty()) {
        terms.push(keyword.to_string());
    }
    terms.push(format!("repo:{}", repo));
    terms.push(format!("head:{}", branch));
    terms.push("type:pr".to_string());
    terms.push(format!("is:{}", state));
    if let Some(author) = author.filter(|a| !a.is_empty()) {
        terms.push(format!("author:{}", author));
    }
    Ok(terms.join(" "))
}

#[derive(Deserialize)]
struct SearchResults {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Deserialize)]
struct SearchItem {
    number: u64,
}
