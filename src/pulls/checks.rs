//! pulls::checks
//!
//! CI status aggregation for a pull request's latest commit.

use serde::Deserialize;
use tracing::{debug, instrument};

use super::pr_id;
use super::types::{CheckResult, CheckState};
use crate::client::GitHubClient;
use crate::error::GitError;
use crate::remote::RemoteRequest;

impl GitHubClient {
    /// Statuses reported against the last commit of a pull request.
    ///
    /// State strings this engine doesn't recognize are kept as
    /// [`CheckState::Unknown`]. A pull request without commits has no checks.
    #[instrument(skip_all, fields(pr = %pr_uri))]
    pub async fn pull_request_checks(&self, pr_uri: &str) -> Result<Vec<CheckResult>, GitError> {
        let id = pr_id(pr_uri)?;
        let repo = id.repository();

        let commits = self.pull_request_commits_by_id(&id).await?;
        let Some(last) = commits.last() else {
            return Ok(Vec::new());
        };

        let combined: CombinedStatus = self
            .send(RemoteRequest::get(
                repo.api_path(&format!("commits/{}/status", last.sha)),
            ))
            .await
            .map_err(|e| e.located(&last.sha, &repo, &last.sha))?;

        let checks: Vec<CheckResult> = combined.statuses.into_iter().map(CheckResult::from).collect();
        let unknown = checks
            .iter()
            .filter(|c| c.state == CheckState::Unknown)
            .count();
        if unknown > 0 {
            debug!(unknown, "statuses with unrecognized state");
        }
        Ok(checks)
    }
}

#[derive(Deserialize)]
struct CombinedStatus {
    #[serde(default)]
    statuses: Vec<StatusEntry>,
}

#[derive(Deserialize)]
struct StatusEntry {
    #[serde(default)]
    state: String,
    #[serde(default)]
    context: String,
    target_url: Option<String>,
}

impl From<StatusEntry> for CheckResult {
    fn from(entry: StatusEntry) -> Self {
        CheckResult {
            state: CheckState::parse(&entry.state),
            context: entry.context,
            target_url: entry.target_url,
        }
    }
}
