//! auth::provider
//!
//! Token providers backed by a fixed value or the process environment.

use async_trait::async_trait;

use super::errors::AuthError;
use super::TokenProvider;

/// Environment variables consulted by [`EnvTokenProvider`], in order.
pub const TOKEN_ENV_VARS: &[&str] = &["GITHUB_TOKEN", "GH_TOKEN"];

/// A token supplied up front, never refreshed.
pub struct StaticTokenProvider {
    token: String,
    host: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            host: host.into(),
        }
    }
}

// Custom Debug to avoid exposing the token
impl std::fmt::Debug for StaticTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenProvider")
            .field("host", &self.host)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn bearer_token(&self) -> Result<String, AuthError> {
        if self.token.is_empty() {
            return Err(AuthError::NotAuthenticated(self.host.clone()));
        }
        Ok(self.token.clone())
    }

    fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }

    fn host(&self) -> &str {
        &self.host
    }
}

/// Reads the token from the environment on every request.
///
/// Picks the first non-empty variable from [`TOKEN_ENV_VARS`].
#[derive(Debug, Clone)]
pub struct EnvTokenProvider {
    host: String,
}

impl EnvTokenProvider {
    pub fn new(host: impl Into<String>) -> Self {
        Self { host: host.into() }
    }

    fn lookup() -> Option<String> {
        TOKEN_ENV_VARS
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .find(|value| !value.trim().is_empty())
    }
}

#[async_trait]
impl TokenProvider for EnvTokenProvider {
    async fn bearer_token(&self) -> Result<String, AuthError> {
        Self::lookup().ok_or_else(|| AuthError::NotAuthenticated(self.host.clone()))
    }

    fn is_authenticated(&self) -> bool {
        Self::lookup().is_some()
    }

    fn host(&self) -> &str {
        &self.host
    }
}
