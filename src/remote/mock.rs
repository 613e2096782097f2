//! remote::mock
//!
//! Mock executor for deterministic testing.
//!
//! # Design
//!
//! Responses are scripted per `(method, target)`, where the target is the
//! path with its query rendered unencoded (`repos/o/r/contents/a?ref=main`).
//! Each route holds a queue of
//! results; a route returns its queued results in order and keeps repeating
//! the last one. Requests to unscripted routes fail with
//! `RemoteError::NotFound`, which is what the provider reports for absent
//! resources. Every request is recorded for later verification.
//!
//! # Example
//!
//! ```
//! use gitremote::remote::mock::MockExecutor;
//! use gitremote::remote::{Method, RemoteExecutor, RemoteRequest};
//! use serde_json::json;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let exec = MockExecutor::new()
//!     .on(Method::Get, "repos/o/r/git/refs/heads/main", json!({"object": {"sha": "abc"}}));
//!
//! let value = exec.execute(RemoteRequest::get("repos/o/r/git/refs/heads/main")).await.unwrap();
//! assert_eq!(value["object"]["sha"], "abc");
//! assert_eq!(exec.requests().len(), 1);
//! # });
//! ```

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use super::traits::{Method, RemoteError, RemoteExecutor, RemoteRequest};

/// Mock executor for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockExecutor {
    inner: Arc<Mutex<MockExecutorInner>>,
}

#[derive(Debug, Default)]
struct MockExecutorInner {
    /// Scripted results by route.
    routes: HashMap<(Method, String), VecDeque<Result<Value, RemoteError>>>,
    /// Recorded requests for verification.
    requests: Vec<RemoteRequest>,
}

impl MockExecutor {
    /// Create a mock with no scripted routes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a successful response for a route.
    pub fn on(self, method: Method, path: impl Into<String>, response: Value) -> Self {
        self.respond(method, path, Ok(response));
        self
    }

    /// Script a failure for a route.
    pub fn on_error(self, method: Method, path: impl Into<String>, error: RemoteError) -> Self {
        self.respond(method, path, Err(error));
        self
    }

    /// Append a result to a route's queue.
    pub fn respond(
        &self,
        method: Method,
        path: impl Into<String>,
        result: Result<Value, RemoteError>,
    ) {
        let mut inner = self.inner.lock().unwrap();
        inner
            .routes
            .entry((method, path.into()))
            .or_default()
            .push_back(result);
    }

    /// Get all recorded requests, in arrival order.
    pub fn requests(&self) -> Vec<RemoteRequest> {
        let inner = self.inner.lock().unwrap();
        inner.requests.clone()
    }

    /// Recorded `(method, target)` pairs, in arrival order.
    pub fn calls(&self) -> Vec<(Method, String)> {
        let inner = self.inner.lock().unwrap();
        inner
            .requests
            .iter()
            .map(|r| (r.method, r.target()))
            .collect()
    }

    /// Count recorded requests with the given method and target.
    pub fn count(&self, method: Method, target: &str) -> usize {
        let inner = self.inner.lock().unwrap();
        inner
            .requests
            .iter()
            .filter(|r| r.method == method && r.target() == target)
            .count()
    }

    /// Clear recorded requests.
    pub fn clear_requests(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.requests.clear();
    }
}

#[async_trait]
impl RemoteExecutor for MockExecutor {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn execute(&self, request: RemoteRequest) -> Result<Value, RemoteError> {
        let mut inner = self.inner.lock().unwrap();
        inner.requests.push(request.clone());

        let target = request.target();
        let key = (request.method, target.clone());
        match inner.routes.get_mut(&key) {
            Some(queue) if queue.len() > 1 => queue
                .pop_front()
                .unwrap_or_else(|| Err(RemoteError::NotFound(target))),
            Some(queue) => queue
                .front()
                .cloned()
                .unwrap_or_else(|| Err(RemoteError::NotFound(target))),
            None => Err(RemoteError::NotFound(target)),
        }
    }
}
