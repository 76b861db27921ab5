//! Errors raised while constructing the REST gateway.

use thiserror::Error;

/// Failures building a [`crate::RestGitHubGateway`].
#[derive(Debug, Error)]
pub enum ClientBuildError {
    /// The configured API base URL is not an absolute URL.
    #[error("invalid GitHub API URL '{url}': {source}")]
    InvalidBaseUrl {
        /// The rejected value.
        url: String,
        /// Parser error detail.
        #[source]
        source: url::ParseError,
    },

    /// The HTTP client could not be initialised (e.g. TLS backend failure).
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}
