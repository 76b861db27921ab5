//! The GitHub capability the engine reads from and writes to.
//!
//! ## Architectural Layer
//!
//! **Port definition.** The engine defines *what* it needs from GitHub; the
//! `github` crate defines *how* it is supplied. Implementations must be
//! stateless from the engine's point of view: one gateway is shared by every
//! concurrent delivery and is never mutated by the engine.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{GitHubError, IssueTarget};

/// One file touched by a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangedFile {
    /// Path relative to the repository root.
    pub path: String,
    /// Accessor handed back to [`GitHubGateway::file_content`].
    pub contents_url: String,
    /// Whether the pull request deletes the file; removed files have no
    /// content at the head.
    #[serde(default)]
    pub removed: bool,
}

impl ChangedFile {
    /// Creates a changed-file record.
    pub fn new(path: impl Into<String>, contents_url: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            contents_url: contents_url.into(),
            removed: false,
        }
    }

    /// Marks the file as deleted (or not) by the pull request.
    #[must_use]
    pub fn with_removed(mut self, removed: bool) -> Self {
        self.removed = removed;
        self
    }
}

/// Read and comment access to GitHub.
///
/// Every method is a single round trip; retries and rate limiting are the
/// implementation's concern.
#[async_trait]
pub trait GitHubGateway: Send + Sync {
    /// Lists the files changed by a pull request, in GitHub's order.
    async fn pull_request_files(
        &self,
        target: &IssueTarget,
    ) -> Result<Vec<ChangedFile>, GitHubError>;

    /// Fetches the full text of a changed file at the pull request head.
    async fn file_content(&self, file: &ChangedFile) -> Result<String, GitHubError>;

    /// Posts a comment on an issue or pull request thread.
    async fn create_comment(&self, target: &IssueTarget, body: &str) -> Result<(), GitHubError>;
}
