//! Steward entry point.
//!
//! This binary is the composition root for the entire system. Responsibilities:
//!
//! 1. **Load configuration** from the environment (see [`config`]).
//! 2. **Wire observability**: configure `tracing-subscriber` with an
//!    `EnvFilter` (`RUST_LOG`, default `info`) and JSON or pretty output. All
//!    `tracing` spans and events emitted by every crate in the workspace flow
//!    through this subscriber.
//! 3. **Construct infrastructure**: a [`github::RestGitHubGateway`] injected
//!    into a [`reaction::Dispatcher`].
//! 4. **Serve** the webhook listener until the process is stopped.

mod config;

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::{Config, LogFormat};
use github::{GitHubSettings, RestGitHubGateway};
use reaction::{Dispatcher, Login, ReactionConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env().context("failed to load configuration")?;
    init_tracing(config.log_format);
    info!(?config, "starting steward");

    let bot_login = Login::new(config.github_user.clone())
        .context("GITHUB_USER must not be empty")?;

    let gateway = RestGitHubGateway::new(GitHubSettings {
        api_url: config.github_api_url.clone(),
        login: config.github_user.clone(),
        token: config.github_token.clone(),
    })
    .context("failed to build GitHub client")?;

    let dispatcher = Dispatcher::new(
        Arc::new(gateway),
        ReactionConfig {
            bot_login,
            posts_prefix: config.posts_location.clone(),
        },
    )
    .context("failed to build dispatcher")?;

    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.port));
    listener::serve(addr, Arc::new(dispatcher))
        .await
        .with_context(|| format!("webhook listener on {addr} failed"))
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().with_current_span(true).init(),
        LogFormat::Pretty => builder.pretty().init(),
    }
}
