//! config::schema
//!
//! Configuration schema types.
//!
//! # Validation
//!
//! Values are validated after parsing so a bad file is rejected at load
//! time rather than on the first request.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Default GitHub API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Default User-Agent header value for API requests.
pub const DEFAULT_USER_AGENT: &str = "gitremote";

/// Default `X-GitHub-Api-Version` header value.
pub const DEFAULT_API_VERSION: &str = "2022-11-28";

/// Title and description used for pull requests created without one.
pub const DEFAULT_PR_TAG: &str = "[gitremote] Automated update";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Client configuration.
///
/// # Example
///
/// ```toml
/// api_base = "https://github.example.com/api/v3"
/// user_agent = "release-bot"
/// timeout_secs = 30
///
/// [pull_requests]
/// default_title = "Automated dependency update"
/// default_description = "Created by release-bot"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// API base URL (GitHub Enterprise uses `https://host/api/v3`)
    pub api_base: Option<String>,

    /// User-Agent header sent with every request
    pub user_agent: Option<String>,

    /// `X-GitHub-Api-Version` header value
    pub api_version: Option<String>,

    /// Per-request timeout
    pub timeout_secs: Option<u64>,

    /// Pull request defaults
    pub pull_requests: Option<PullRequestDefaults>,
}

impl ClientConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(base) = &self.api_base {
            if !(base.starts_with("https://") || base.starts_with("http://")) {
                return Err(ConfigError::InvalidValue(format!(
                    "api_base '{}' must be an http(s) URL",
                    base
                )));
            }
        }

        if let Some(agent) = &self.user_agent {
            if agent.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "user_agent cannot be empty".to_string(),
                ));
            }
        }

        if self.timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// API base URL without a trailing slash.
    pub fn api_base(&self) -> &str {
        self.api_base
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE)
            .trim_end_matches('/')
    }

    pub fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }

    pub fn api_version(&self) -> &str {
        self.api_version.as_deref().unwrap_or(DEFAULT_API_VERSION)
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// Title used when a pull request is created without one.
    pub fn default_pr_title(&self) -> &str {
        self.pull_requests
            .as_ref()
            .and_then(|p| p.default_title.as_deref())
            .unwrap_or(DEFAULT_PR_TAG)
    }

    /// Description used when a pull request is created without one.
    pub fn default_pr_description(&self) -> &str {
        self.pull_requests
            .as_ref()
            .and_then(|p| p.default_description.as_deref())
            .unwrap_or(DEFAULT_PR_TAG)
    }
}

/// Pull request defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PullRequestDefaults {
    pub default_title: Option<String>,
    pub default_description: Option<String>,
}
