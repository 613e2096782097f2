//! Shared fixtures for unit tests.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::client::GitHubClient;
use crate::config::ClientConfig;
use crate::remote::mock::MockExecutor;
use crate::uri::RepositoryId;

/// Client backed by `exec`, with default configuration.
pub fn client(exec: &MockExecutor) -> GitHubClient {
    GitHubClient::new(Arc::new(exec.clone()), ClientConfig::default())
}

/// The `o/r` repository every fixture route is scripted against.
pub fn repo() -> RepositoryId {
    RepositoryId::new("o", "r")
}

/// Provider git ref response.
pub fn ref_json(branch: &str, sha: &str) -> Value {
    json!({
        "ref": format!("refs/heads/{}", branch),
        "object": {"sha": sha, "type": "commit"}
    })
}

/// Provider pull request response.
pub fn pr_json(number: u64, state: &str, merged: bool) -> Value {
    json!({
        "number": number,
        "state": state,
        "merged": merged,
        "title": "Title",
        "body": "Body",
        "html_url": format!("https://github.com/o/r/pull/{}", number),
        "url": format!("https://api.github.com/repos/o/r/pulls/{}", number),
        "head": {"ref": "feature", "sha": "headsha"},
        "base": {"ref": "main", "sha": "basesha"},
        "created_at": "2024-05-01T10:00:00Z",
        "updated_at": "2024-05-02T10:00:00Z",
        "merged_at": null,
        "closed_at": null
    })
}
