//! remote::http
//!
//! GitHub REST executor built on `reqwest`.
//!
//! # Authentication
//!
//! A [`TokenProvider`] is asked for a bearer token on every request. If the
//! provider's token is rejected (401/403), the request is retried once with
//! a freshly fetched token so refreshing providers recover transparently.
//!
//! A token that cannot be sent as a header value is reported as
//! `AuthRequired` and never retried.
//!
//! # Encoding
//!
//! Request paths are split on `/` and each segment is percent-encoded, so
//! `#`, `?`, and `%` inside a branch name or file path stay part of that
//! segment. Query pairs are form-encoded.
//!
//! # Rate Limiting
//!
//! Throttled requests return `RemoteError::RateLimited`. Backoff is the
//! caller's responsibility.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Response, StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

use super::traits::{Method, RemoteError, RemoteExecutor, RemoteRequest};
use crate::auth::{AuthError, TokenProvider};
use crate::config::ClientConfig;

/// Executes remote commands over HTTPS against the GitHub REST API.
pub struct HttpExecutor {
    /// HTTP client; its connection pool is shared by every request
    client: Client,
    token_provider: Arc<dyn TokenProvider>,
    /// API base URL without trailing slash
    api_base: String,
    /// Parsed base that request paths are appended to
    base_url: Url,
    user_agent: HeaderValue,
    api_version: HeaderValue,
}

// Custom Debug to keep the provider (and its token) out of logs
impl std::fmt::Debug for HttpExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpExecutor")
            .field("host", &self.token_provider.host())
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl HttpExecutor {
    /// Create an executor from configuration.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError` if the HTTP client cannot be built, or
    /// `ApiError` with status 0 if the API base or configured header values
    /// are invalid.
    pub fn new(
        provider: Arc<dyn TokenProvider>,
        config: &ClientConfig,
    ) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| RemoteError::NetworkError(e.to_string()))?;

        let invalid_header = |what: &str| RemoteError::ApiError {
            status: 0,
            message: format!("invalid {} header value", what),
        };

        let base_url = Url::parse(config.api_base())
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| RemoteError::ApiError {
                status: 0,
                message: format!("invalid api_base '{}'", config.api_base()),
            })?;

        Ok(Self {
            client,
            token_provider: provider,
            api_base: config.api_base().to_string(),
            base_url,
            user_agent: HeaderValue::from_str(config.user_agent())
                .map_err(|_| invalid_header("User-Agent"))?,
            api_version: HeaderValue::from_str(config.api_version())
                .map_err(|_| invalid_header("X-GitHub-Api-Version"))?,
        })
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Build the absolute URL for a request, encoding each path segment
    /// and query pair.
    fn url(&self, request: &RemoteRequest) -> Url {
        let mut url = self.base_url.clone();
        // base_url is checked to be a base in `new`
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(request.path.trim_start_matches('/').split('/'));
        }
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }
        url
    }

    /// Build common headers (async to allow token refresh).
    async fn headers(&self) -> Result<HeaderMap, RemoteError> {
        let token = self
            .token_provider
            .bearer_token()
            .await
            .map_err(|e| RemoteError::AuthRequired(e.to_string()))?;

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
            let err = AuthError::MalformedToken(self.token_provider.host().to_string());
            RemoteError::AuthRequired(err.to_string())
        })?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(USER_AGENT, self.user_agent.clone());
        headers.insert("X-GitHub-Api-Version", self.api_version.clone());
        Ok(headers)
    }

    /// Check if an error is an auth failure that might be resolved by token refresh.
    fn is_retryable_auth_error(err: &RemoteError) -> bool {
        matches!(err, RemoteError::AuthFailed(_))
    }

    async fn send_once(&self, request: &RemoteRequest) -> Result<Value, RemoteError> {
        let url = self.url(request);
        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), url)
            .headers(self.headers().await?);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| RemoteError::NetworkError(e.to_string()))?;

        self.handle_response(response, &request.target()).await
    }

    /// Handle API response, mapping errors appropriately.
    async fn handle_response(&self, response: Response, path: &str) -> Result<Value, RemoteError> {
        let status = response.status();

        if !status.is_success() {
            return Err(self.handle_error_response(response, status, path).await);
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| RemoteError::NetworkError(e.to_string()))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|e| RemoteError::InvalidBody(e.to_string()))
    }

    /// Map an error response from the API.
    async fn handle_error_response(
        &self,
        response: Response,
        status: StatusCode,
        path: &str,
    ) -> RemoteError {
        // Read throttling and permission headers before consuming the body.
        let headers = response.headers();
        let rate_limit_exhausted = headers
            .get("X-RateLimit-Remaining")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == "0");
        let required_permissions = headers
            .get("X-Accepted-GitHub-Permissions")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let message = match response.json::<GitHubErrorResponse>().await {
            Ok(err) => err.message,
            Err(_) => "Unknown error".to_string(),
        };

        match status {
            StatusCode::UNAUTHORIZED => RemoteError::AuthFailed("Invalid or expired token".into()),
            StatusCode::FORBIDDEN if rate_limit_exhausted => RemoteError::RateLimited,
            StatusCode::FORBIDDEN => {
                let mut err_msg = format!("Permission denied: {}", message);
                if let Some(perms) = required_permissions.filter(|p| !p.is_empty()) {
                    err_msg.push_str(&format!(" [required: {}]", perms));
                }
                RemoteError::AuthFailed(err_msg)
            }
            StatusCode::NOT_FOUND => RemoteError::NotFound(path.to_string()),
            StatusCode::TOO_MANY_REQUESTS => RemoteError::RateLimited,
            _ if status.is_server_error() => RemoteError::ApiError {
                status: status.as_u16(),
                message: format!("GitHub server error: {}", message),
            },
            _ => RemoteError::ApiError {
                status: status.as_u16(),
                message,
            },
        }
    }
}

#[async_trait]
impl RemoteExecutor for HttpExecutor {
    fn name(&self) -> &'static str {
        "github"
    }

    #[instrument(skip_all, fields(method = %request.method, path = %request.target()))]
    async fn execute(&self, request: RemoteRequest) -> Result<Value, RemoteError> {
        let result = self.send_once(&request).await;

        // Retry once on auth failure with a freshly fetched token
        match result {
            Err(ref e) if Self::is_retryable_auth_error(e) => {
                debug!("authentication rejected, retrying with fresh token");
                self.send_once(&request).await
            }
            Err(e) => {
                debug!(error = %e, "remote command failed");
                Err(e)
            }
            ok => ok,
        }
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Patch => reqwest::Method::PATCH,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}

/// GitHub error response format.
#[derive(Deserialize)]
struct GitHubErrorResponse {
    message: String,
}
