//! remote
//!
//! The Remote Command Executor: issues authenticated requests against the
//! provider API and classifies transport-level failures.
//!
//! # Modules
//!
//! - `traits`: [`RemoteExecutor`] trait, [`RemoteRequest`], [`RemoteError`]
//! - [`http`]: reqwest-based GitHub REST executor
//! - [`mock`]: scripted executor for deterministic testing

pub mod http;
pub mod mock;
mod traits;

pub use http::HttpExecutor;
pub use traits::*;
