//! pulls::types
//!
//! Pull request, check, review and comment types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// State of a pull request as the engine models it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PullRequestStatus {
    Open,
    Closed,
    Merged,
    /// State the provider reported that none of the others describe.
    None,
}

impl PullRequestStatus {
    /// Classify a provider `state` string and `merged` flag.
    ///
    /// Only `closed` consults `merged`.
    pub fn from_provider(state: Option<&str>, merged: Option<bool>) -> Self {
        match state {
            Some("open") => PullRequestStatus::Open,
            Some("closed") if merged == Some(true) => PullRequestStatus::Merged,
            Some("closed") => PullRequestStatus::Closed,
            _ => PullRequestStatus::None,
        }
    }

    /// Search qualifier token (`is:{token}`), if this status is searchable.
    pub fn search_token(&self) -> Option<&'static str> {
        match self {
            PullRequestStatus::Open => Some("open"),
            PullRequestStatus::Closed => Some("closed"),
            PullRequestStatus::Merged => Some("merged"),
            PullRequestStatus::None => None,
        }
    }
}

impl fmt::Display for PullRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PullRequestStatus::Open => "open",
            PullRequestStatus::Closed => "closed",
            PullRequestStatus::Merged => "merged",
            PullRequestStatus::None => "none",
        };
        f.write_str(s)
    }
}

/// Commit status of a single CI context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckState {
    Success,
    Pending,
    Failure,
    Error,
    /// The provider reported a state string this engine doesn't know.
    Unknown,
}

impl CheckState {
    /// Parse a provider state string, case-insensitively.
    pub fn parse(state: &str) -> Self {
        match state.to_ascii_lowercase().as_str() {
            "success" => CheckState::Success,
            "pending" => CheckState::Pending,
            "failure" => CheckState::Failure,
            "error" => CheckState::Error,
            _ => CheckState::Unknown,
        }
    }
}

/// One CI status attached to a pull request's head commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub state: CheckState,
    /// Name of the reporting system, e.g. `ci/build`
    pub context: String,
    pub target_url: Option<String>,
}

/// Pull request as read from the provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    #[serde(default)]
    pub title: String,
    /// Description; the provider returns `null` when empty.
    #[serde(default)]
    pub body: Option<String>,
    pub state: String,
    #[serde(default)]
    pub merged: bool,
    pub html_url: String,
    /// API URL of the pull request.
    pub url: String,
    pub head: BranchTip,
    pub base: BranchTip,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub merged_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
}

impl PullRequest {
    pub fn status(&self) -> PullRequestStatus {
        PullRequestStatus::from_provider(Some(&self.state), Some(self.merged))
    }
}

/// Branch end of a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BranchTip {
    #[serde(rename = "ref")]
    pub name: String,
    pub sha: String,
}

/// Whether an upsert creates a new pull request or edits an existing one.
///
/// Callers choose; the engine never infers it from remote state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertMethod {
    /// Open a new pull request; the URI names the repository.
    Create,
    /// Edit an existing pull request; the URI names the pull request.
    Update,
}

/// Fields of a pull request to create or update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestUpsert {
    pub method: UpsertMethod,
    pub head_branch: String,
    pub base_branch: String,
    pub title: Option<String>,
    pub description: Option<String>,
}

impl PullRequestUpsert {
    pub fn create(head_branch: impl Into<String>, base_branch: impl Into<String>) -> Self {
        Self {
            method: UpsertMethod::Create,
            head_branch: head_branch.into(),
            base_branch: base_branch.into(),
            title: None,
            description: None,
        }
    }

    pub fn update(head_branch: impl Into<String>, base_branch: impl Into<String>) -> Self {
        Self {
            method: UpsertMethod::Update,
            ..Self::create(head_branch, base_branch)
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// How to merge a pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOptions {
    /// Head sha the merge must apply to; the provider refuses the merge if
    /// the head has moved.
    pub commit_to_merge: Option<String>,
    /// Squash instead of creating a merge commit.
    pub squash_merge: bool,
    /// Delete the head branch after a successful merge.
    pub delete_source_branch: bool,
    pub commit_message: Option<String>,
}

impl MergeOptions {
    pub fn merge_method(&self) -> &'static str {
        if self.squash_merge {
            "squash"
        } else {
            "merge"
        }
    }
}

/// What happened to the head branch after a merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchDeletion {
    NotRequested,
    Deleted(String),
    /// The merge stands; the branch is still there.
    Failed { branch: String, reason: String },
}

/// Result of a merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Sha of the merge (or squash) commit
    pub sha: String,
    pub branch_deletion: BranchDeletion,
}

impl MergeOutcome {
    /// Whether the merge succeeded but a requested branch deletion did not.
    pub fn is_partial(&self) -> bool {
        matches!(self.branch_deletion, BranchDeletion::Failed { .. })
    }
}

/// Issue comment on a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Comment {
    pub id: u64,
    #[serde(default)]
    pub body: String,
    pub html_url: Option<String>,
}

/// Review verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewState {
    Approved,
    ChangesRequested,
    Commented,
    Pending,
    Dismissed,
    Unknown,
}

impl ReviewState {
    pub fn parse(state: &str) -> Self {
        match state {
            "APPROVED" => ReviewState::Approved,
            "CHANGES_REQUESTED" => ReviewState::ChangesRequested,
            "COMMENTED" => ReviewState::Commented,
            "PENDING" => ReviewState::Pending,
            "DISMISSED" => ReviewState::Dismissed,
            _ => ReviewState::Unknown,
        }
    }
}

/// A submitted or pending review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub id: u64,
    pub state: ReviewState,
    /// Reviewer login; absent for deleted accounts
    pub user: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,
}
