//! Steward GitHub infrastructure adapter.
//!
//! Implements the [`reaction::GitHubGateway`] port over the GitHub REST API
//! using [`reqwest`].
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** This crate must not contain reaction rules.
//! Authentication, pagination and response decoding are handled here; the
//! [`reaction`] crate never sees them.
//!
//! ## Endpoints
//!
//! | Port method | Request |
//! |-------------|---------|
//! | `pull_request_files` | `GET /repos/{owner}/{repo}/pulls/{number}/files` (paginated) |
//! | `file_content` | `GET {contents_url}` with the raw media type |
//! | `create_comment` | `POST /repos/{owner}/{repo}/issues/{number}/comments` |
//!
//! Every call is a single round trip per page; there is no retry.

mod client;
mod error;

pub use client::{GitHubSettings, RestGitHubGateway, DEFAULT_API_URL};
pub use error::ClientBuildError;
