//! remote::traits
//!
//! The executor contract the engine is written against.
//!
//! # Design
//!
//! An executor takes a method, an API path relative to the provider's API
//! base, query parameters, and an optional JSON body, and returns the
//! decoded JSON response.
//!
//! Paths and query values are carried unencoded. Each `/`-separated path
//! segment and each query pair is percent-encoded by the executor, so a
//! branch such as `release#2` or a file such as `docs/C#.md` addresses
//! exactly that ref or file.
//! Failures are classified by [`RemoteError`] rather than by matching on
//! message text, so callers that branch on "not found" pattern-match on
//! [`RemoteError::NotFound`].
//!
//! Retry and backoff policy belongs to executors, never to the engine.

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors from remote command execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// Authentication is required but not available.
    #[error("authentication required: {0}")]
    AuthRequired(String),

    /// Authentication failed (invalid token, expired, insufficient permissions).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The requested resource was not found (HTTP 404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded.
    #[error("rate limited")]
    RateLimited,

    /// API returned an error status.
    #[error("API error: {status} - {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Network or connection error.
    #[error("network error: {0}")]
    NetworkError(String),

    /// Response body could not be read as JSON.
    #[error("invalid response body: {0}")]
    InvalidBody(String),
}

impl RemoteError {
    /// Whether this failure is the provider reporting the resource absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, RemoteError::NotFound(_))
    }

    /// HTTP status associated with the failure, when there is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            RemoteError::AuthFailed(_) => Some(401),
            RemoteError::NotFound(_) => Some(404),
            RemoteError::RateLimited => Some(429),
            RemoteError::ApiError { status, .. } => Some(*status),
            RemoteError::AuthRequired(_)
            | RemoteError::NetworkError(_)
            | RemoteError::InvalidBody(_) => None,
        }
    }
}

/// HTTP method of a remote command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Patch => write!(f, "PATCH"),
            Method::Put => write!(f, "PUT"),
            Method::Delete => write!(f, "DELETE"),
        }
    }
}

/// A single request against the provider API.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteRequest {
    pub method: Method,
    /// Path relative to the API base, e.g. `repos/o/r/git/blobs`
    pub path: String,
    /// Query parameters, unencoded
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RemoteRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: Method::Delete,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            query: Vec::new(),
            body: Some(body),
        }
    }

    pub fn patch(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Patch,
            path: path.into(),
            query: Vec::new(),
            body: Some(body),
        }
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Put,
            path: path.into(),
            query: Vec::new(),
            body: Some(body),
        }
    }

    /// Append a query parameter.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Path with its query rendered unencoded, e.g. `repos/o/r/contents/a?ref=main`.
    pub fn target(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query: Vec<String> = self
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        format!("{}?{}", self.path, query.join("&"))
    }
}

impl fmt::Display for RemoteRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.target())
    }
}

/// Issues authenticated requests against the provider API.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; one executor is shared by every
/// call made through a [`GitHubClient`](crate::client::GitHubClient).
///
/// # Responses
///
/// Successful responses are returned as JSON. An empty body (for example
/// `204 No Content`) is returned as [`Value::Null`].
#[async_trait]
pub trait RemoteExecutor: Send + Sync {
    /// Short name of the executor, for diagnostics.
    fn name(&self) -> &'static str;

    /// Execute one request.
    ///
    /// # Errors
    ///
    /// - `NotFound` for HTTP 404
    /// - `AuthRequired` / `AuthFailed` for credential problems
    /// - `RateLimited` when the provider throttles the caller
    /// - `ApiError` for any other non-success status
    /// - `NetworkError` when no response was received
    async fn execute(&self, request: RemoteRequest) -> Result<Value, RemoteError>;
}
