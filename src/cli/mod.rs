//! cli
//!
//! Command-line interface for gitremote.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Install the tracing subscriber
//! - Build a [`GitHubClient`] from configuration and hand it to a command
//!
//! Commands are thin: each one parses its inputs, calls one or two engine
//! operations, and prints the result.

pub mod args;
pub mod commands;

pub use args::{Cli, Command, PrCommand, Shell};

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::Layer as _;

use crate::client::GitHubClient;
use crate::config::ClientConfig;

/// Settings shared by every command.
#[derive(Debug, Clone, Default)]
pub struct Context {
    pub api_base: Option<String>,
    pub config_path: Option<PathBuf>,
}

impl Context {
    /// Configuration with command-line overrides applied.
    pub fn config(&self) -> Result<ClientConfig> {
        let mut config = match &self.config_path {
            Some(path) => ClientConfig::from_path(path)?,
            None => ClientConfig::load()?,
        };
        if let Some(api_base) = &self.api_base {
            config.api_base = Some(api_base.clone());
            config.validate()?;
        }
        Ok(config)
    }

    /// Client authenticated from the environment.
    pub fn client(&self) -> Result<GitHubClient> {
        let config = self.config()?;
        GitHubClient::from_env(config).context("failed to create GitHub client")
    }
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    setup_logging(cli.debug)?;

    let ctx = Context {
        api_base: cli.api_base.clone(),
        config_path: cli.config.clone(),
    };

    commands::dispatch(cli.command, &ctx)
}

/// Log to stderr, filtered by `RUST_LOG`; `--debug` raises the default
/// level from `warn` to `debug`.
fn setup_logging(debug: bool) -> Result<()> {
    let default_level = if debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let timer = tracing_subscriber::fmt::time::ChronoLocal::new("%H:%M:%S%.3f".into());
    let format = tracing_subscriber::fmt::format().with_timer(timer);
    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env()?;
    let layer = tracing_subscriber::fmt::layer()
        .event_format(format)
        .with_writer(std::io::stderr)
        .with_filter(filter);
    tracing_subscriber::registry().with(layer).try_init()?;
    Ok(())
}
