//! uri
//!
//! Resolves human-facing repository and pull request URLs into the
//! identifiers the GitHub API is addressed by.
//!
//! # Shapes
//!
//! - Repository: `scheme://host/{owner}/{repo}[.git][/]`
//! - Pull request: `scheme://host/repos/{owner}/{repo}/pulls/{id}`
//!
//! GitHub Enterprise API URLs (`https://host/api/v3/repos/...`) are
//! accepted for pull requests as well.
//!
//! Both parsers return `None` when the input does not have the expected
//! shape. They never panic, so callers can feed arbitrary user input.
//!
//! # Example
//!
//! ```
//! use gitremote::uri::{parse_pr_uri, parse_repo_uri};
//!
//! let repo = parse_repo_uri("https://github.com/octocat/hello-world").unwrap();
//! assert_eq!(repo.owner, "octocat");
//! assert_eq!(repo.repo, "hello-world");
//!
//! let pr = parse_pr_uri("https://api.github.com/repos/octocat/hello-world/pulls/42").unwrap();
//! assert_eq!(pr.number, 42);
//!
//! assert!(parse_repo_uri("not a url").is_none());
//! ```

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static REPO_URI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://[^/\s]+/(?P<owner>[^/\s]+)/(?P<repo>[^/\s]+?)(?:\.git)?/?$")
        .expect("repository URI pattern is valid")
});

static PR_URI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z][A-Za-z0-9+.\-]*://[^/\s]+(?:/api/v3)?/repos/(?P<owner>[^/\s]+)/(?P<repo>[^/\s]+)/pulls/(?P<id>[0-9]+)/?$",
    )
    .expect("pull request URI pattern is valid")
});

/// Identifies a repository on the provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryId {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
}

impl RepositoryId {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// API path for an endpoint under this repository, relative to the API base.
    ///
    /// An empty `path` yields the repository resource itself.
    pub fn api_path(&self, path: &str) -> String {
        if path.is_empty() {
            format!("repos/{}/{}", self.owner, self.repo)
        } else {
            format!("repos/{}/{}/{}", self.owner, self.repo, path)
        }
    }
}

impl fmt::Display for RepositoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Identifies a single pull request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PullRequestId {
    /// Repository owner
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Pull request number
    pub number: u64,
}

impl PullRequestId {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, number: u64) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            number,
        }
    }

    /// The repository this pull request belongs to.
    pub fn repository(&self) -> RepositoryId {
        RepositoryId::new(self.owner.clone(), self.repo.clone())
    }

    /// Render the API URL for this pull request.
    ///
    /// The result always parses back through [`parse_pr_uri`].
    pub fn api_url(&self, api_base: &str) -> String {
        format!(
            "{}/repos/{}/{}/pulls/{}",
            api_base.trim_end_matches('/'),
            self.owner,
            self.repo,
            self.number
        )
    }
}

impl fmt::Display for PullRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}

/// Parse a repository URL into its owner and name.
///
/// Returns `None` if the URL doesn't match `scheme://host/{owner}/{repo}`.
pub fn parse_repo_uri(uri: &str) -> Option<RepositoryId> {
    let caps = REPO_URI.captures(uri.trim())?;
    let repo = &caps["repo"];
    if repo.is_empty() {
        return None;
    }
    Some(RepositoryId::new(&caps["owner"], repo))
}

/// Parse a pull request API URL into owner, repo, and number.
///
/// Returns `None` if the shape doesn't match or the number is not a
/// positive integer.
pub fn parse_pr_uri(uri: &str) -> Option<PullRequestId> {
    let caps = PR_URI.captures(uri.trim())?;
    let number: u64 = caps["id"].parse().ok()?;
    if number == 0 {
        return None;
    }
    Some(PullRequestId::new(&caps["owner"], &caps["repo"], number))
}
