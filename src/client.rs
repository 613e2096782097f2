//! client
//!
//! The engine handle every operation hangs off.
//!
//! # Lifecycle
//!
//! A [`GitHubClient`] is constructed once and reused for all calls. It owns
//! the executor (and through it the HTTP connection pool); there is no
//! global client. Operations are implemented in [`crate::git`] and
//! [`crate::pulls`] as inherent methods.
//!
//! # Example
//!
//! ```no_run
//! use gitremote::client::GitHubClient;
//! use gitremote::config::ClientConfig;
//! use gitremote::git::GitFile;
//! use gitremote::uri::parse_repo_uri;
//!
//! # async fn run() -> Result<(), gitremote::GitError> {
//! let client = GitHubClient::from_env(ClientConfig::load().unwrap_or_default())?;
//! let repo = parse_repo_uri("https://github.com/octocat/hello-world").unwrap();
//!
//! client
//!     .commit_and_push(&repo, "main", &[GitFile::text("README.md", "hello\n")], "Update readme")
//!     .await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::auth::{EnvTokenProvider, StaticTokenProvider, TokenProvider};
use crate::config::ClientConfig;
use crate::error::GitError;
use crate::remote::{HttpExecutor, RemoteExecutor, RemoteRequest};

/// Client for the remote Git object graph and pull request lifecycle.
#[derive(Clone)]
pub struct GitHubClient {
    executor: Arc<dyn RemoteExecutor>,
    config: ClientConfig,
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("executor", &self.executor.name())
            .field("api_base", &self.config.api_base())
            .finish()
    }
}

impl GitHubClient {
    /// Create a client over an existing executor.
    pub fn new(executor: Arc<dyn RemoteExecutor>, config: ClientConfig) -> Self {
        Self { executor, config }
    }

    /// Create a client that talks HTTPS to the configured API base.
    pub fn with_provider(
        provider: Arc<dyn TokenProvider>,
        config: ClientConfig,
    ) -> Result<Self, GitError> {
        let executor = HttpExecutor::new(provider, &config)?;
        Ok(Self::new(Arc::new(executor), config))
    }

    /// Create an HTTPS client authenticated with a fixed token.
    pub fn with_token(token: impl Into<String>, config: ClientConfig) -> Result<Self, GitError> {
        let host = api_host(config.api_base());
        Self::with_provider(Arc::new(StaticTokenProvider::new(token, host)), config)
    }

    /// Create an HTTPS client authenticated from `GITHUB_TOKEN` / `GH_TOKEN`.
    pub fn from_env(config: ClientConfig) -> Result<Self, GitError> {
        let host = api_host(config.api_base());
        Self::with_provider(Arc::new(EnvTokenProvider::new(host)), config)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Execute a request and decode its JSON response.
    pub(crate) async fn send<T: DeserializeOwned>(
        &self,
        request: RemoteRequest,
    ) -> Result<T, GitError> {
        let context = request.to_string();
        let value = self.executor.execute(request).await?;
        serde_json::from_value(value).map_err(|e| GitError::Decode {
            context,
            message: e.to_string(),
        })
    }

    /// Execute a request whose response body is not needed.
    pub(crate) async fn send_unit(&self, request: RemoteRequest) -> Result<(), GitError> {
        self.executor.execute(request).await?;
        Ok(())
    }
}

/// Host portion of an API base URL, used to label token providers.
fn api_host(api_base: &str) -> String {
    api_base
        .split("://")
        .nth(1)
        .unwrap_or(api_base)
        .split('/')
        .next()
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::mock::MockExecutor;
    use crate::remote::{Method, RemoteError};
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Sha {
        sha: String,
    }

    fn client(exec: &MockExecutor) -> GitHubClient {
        GitHubClient::new(Arc::new(exec.clone()), ClientConfig::default())
    }

    #[test]
    fn api_host_extraction() {
        assert_eq!(api_host("https://api.github.com"), "api.github.com");
        assert_eq!(
            api_host("https://github.example.com/api/v3"),
            "github.example.com"
        );
        assert_eq!(api_host("localhost:8080"), "localhost:8080");
    }

    #[test]
    fn debug_names_executor() {
        let exec = MockExecutor::new();
        let debug_output = format!("{:?}", client(&exec));
        assert!(debug_output.contains("mock"));
        assert!(debug_output.contains("api.github.com"));
    }

    #[test]
    fn with_token_builds_http_client() {
        let client = GitHubClient::with_token("t", ClientConfig::default()).unwrap();
        assert!(format!("{:?}", client).contains("github"));
    }

    #[tokio::test]
    async fn send_decodes_json() {
        let exec = MockExecutor::new().on(Method::Get, "x", json!({"sha": "abc"}));
        let sha: Sha = client(&exec).send(RemoteRequest::get("x")).await.unwrap();
        assert_eq!(sha.sha, "abc");
    }

    #[tokio::test]
    async fn send_reports_decode_context() {
        let exec = MockExecutor::new().on(Method::Get, "x", json!({"nope": 1}));
        let err = client(&exec)
            .send::<Sha>(RemoteRequest::get("x"))
            .await
            .unwrap_err();
        match err {
            GitError::Decode { context, .. } => assert_eq!(context, "GET x"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn send_propagates_remote_error() {
        let exec = MockExecutor::new().on_error(Method::Get, "x", RemoteError::RateLimited);
        let err = client(&exec).send_unit(RemoteRequest::get("x")).await.unwrap_err();
        assert!(matches!(err, GitError::Remote(RemoteError::RateLimited)));
    }
}
