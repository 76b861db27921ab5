//! In-memory [`GitHubGateway`] for tests.
//!
//! Available inside this crate's tests and, through the `test-support`
//! feature, to downstream crates.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::{ChangedFile, GitHubError, GitHubGateway, IssueTarget};

/// Serves canned pull request files and records posted comments.
#[derive(Debug, Default)]
pub struct RecordingGateway {
    files: Vec<ChangedFile>,
    contents: HashMap<String, String>,
    comments: Mutex<Vec<(IssueTarget, String)>>,
    failing: bool,
}

impl RecordingGateway {
    /// Creates a gateway with no files.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a changed file with the given content.
    #[must_use]
    pub fn with_file(mut self, path: &str, content: &str) -> Self {
        let contents_url = format!("https://api.github.test/contents/{path}");
        self.contents.insert(contents_url.clone(), content.to_string());
        self.files.push(ChangedFile::new(path, contents_url));
        self
    }

    /// Adds a file the pull request deletes; fetching its content fails.
    #[must_use]
    pub fn with_removed_file(mut self, path: &str) -> Self {
        let contents_url = format!("https://api.github.test/contents/{path}");
        self.files.push(ChangedFile::new(path, contents_url).with_removed(true));
        self
    }

    /// Makes every call fail with a server error.
    #[must_use]
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    /// Returns the files this gateway lists for any pull request.
    pub fn files(&self) -> Vec<ChangedFile> {
        self.files.clone()
    }

    /// Returns the comments posted so far, oldest first.
    pub fn comments(&self) -> Vec<(IssueTarget, String)> {
        self.comments
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn check_failure(&self) -> Result<(), GitHubError> {
        if self.failing {
            return Err(GitHubError::Api {
                status: 502,
                message: "gateway configured to fail".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl GitHubGateway for RecordingGateway {
    async fn pull_request_files(
        &self,
        _target: &IssueTarget,
    ) -> Result<Vec<ChangedFile>, GitHubError> {
        self.check_failure()?;
        Ok(self.files.clone())
    }

    async fn file_content(&self, file: &ChangedFile) -> Result<String, GitHubError> {
        self.check_failure()?;
        self.contents
            .get(&file.contents_url)
            .cloned()
            .ok_or_else(|| GitHubError::Api {
                status: 404,
                message: format!("no content for {}", file.path),
            })
    }

    async fn create_comment(&self, target: &IssueTarget, body: &str) -> Result<(), GitHubError> {
        self.check_failure()?;
        self.comments
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((target.clone(), body.to_string()));
        Ok(())
    }
}
