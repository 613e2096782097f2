//! auth::errors
//!
//! Authentication error types.
//!
//! Error messages never contain token values.

use thiserror::Error;

/// Errors from token providers.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// No token is configured for the host.
    #[error("not authenticated for host '{0}'. Set GITHUB_TOKEN or GH_TOKEN.")]
    NotAuthenticated(String),

    /// A configured token cannot be used in an HTTP header.
    #[error("token for host '{0}' contains characters not allowed in a header")]
    MalformedToken(String),
}
