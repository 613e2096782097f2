//! auth
//!
//! Bearer token sources for the remote executor.
//!
//! Credential storage and OAuth flows live outside this crate. The engine
//! only needs something that hands back a bearer token per request, which
//! is what [`TokenProvider`] models.
//!
//! # Example
//!
//! ```
//! use gitremote::auth::{StaticTokenProvider, TokenProvider};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let provider = StaticTokenProvider::new("ghp_example", "github.com");
//! assert_eq!(provider.bearer_token().await.unwrap(), "ghp_example");
//! # });
//! ```

mod errors;
mod provider;

pub use errors::AuthError;
pub use provider::{EnvTokenProvider, StaticTokenProvider, TOKEN_ENV_VARS};

/// Trait for providing bearer tokens to the HTTP executor.
///
/// Implementors must never log or expose token values. Providers that can
/// refresh should do so inside [`bearer_token`](TokenProvider::bearer_token);
/// the executor calls it again after an authentication failure.
#[async_trait::async_trait]
pub trait TokenProvider: Send + Sync {
    /// Returns a bearer token, refreshing if the source supports it.
    ///
    /// # Errors
    ///
    /// - [`AuthError::NotAuthenticated`] if no token is available
    async fn bearer_token(&self) -> Result<String, AuthError>;

    /// Check if a token is available without fetching it.
    fn is_authenticated(&self) -> bool;

    /// Get the host this provider authenticates for.
    fn host(&self) -> &str;
}
