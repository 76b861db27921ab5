//! Error types for the reaction engine.
//!
//! [`ReactionError`] covers everything that can make a single reaction fail.
//! The [`crate::Dispatcher`] is the only place these errors are folded into a
//! [`crate::DispatchResult`]; nothing above it ever sees them.
//!
//! [`GitHubError`] is the error type of the [`crate::GitHubGateway`] port.
//! Infrastructure adapters translate their transport errors into it.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Port errors
// ---------------------------------------------------------------------------

/// Failures reported by a [`crate::GitHubGateway`] implementation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GitHubError {
    /// GitHub answered with a non-success status code.
    #[error("GitHub API error {status}: {message}")]
    Api {
        /// HTTP status code returned by GitHub.
        status: u16,
        /// Response body describing the failure.
        message: String,
    },

    /// The request never produced a response.
    #[error("network error talking to GitHub: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// GitHub answered successfully but the body could not be decoded.
    #[error("unexpected GitHub response: {message}")]
    Decode {
        /// Decoder error detail.
        message: String,
    },
}

// ---------------------------------------------------------------------------
// Reaction errors
// ---------------------------------------------------------------------------

/// Errors raised while reacting to one webhook delivery.
#[derive(Debug, Error)]
pub enum ReactionError {
    /// The payload lacks a field the reaction needs.
    #[error("malformed '{event}' payload: {source}")]
    MalformedPayload {
        /// Event name the payload was delivered with.
        event: String,
        /// Deserialisation failure describing the missing or mistyped field.
        #[source]
        source: serde_json::Error,
    },

    /// A call through the GitHub port failed.
    #[error(transparent)]
    GitHub(#[from] GitHubError),

    /// The engine was constructed with unusable configuration.
    ///
    /// Produced at construction time; a dispatcher never starts with an
    /// invalid configuration.
    #[error("configuration error: {message}")]
    Configuration {
        /// Description of the configuration problem.
        message: String,
    },
}
