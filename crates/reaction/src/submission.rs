//! Article submission checks for newly opened pull requests.
//!
//! Only files under the posts prefix that the pull request keeps are
//! inspected. Each one is checked for
//! nesting depth, file name shape, extension and content; problems are
//! gathered into a [`MessageTree`] keyed by file. A clean submission produces
//! no comment at all.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info};

use crate::message::{render_report, MessageTree};
use crate::{content, ChangedFile, GitHubError, GitHubGateway, IssueTarget};

/// `YYYY-MM-DD-<slug>`, checked against the file stem.
static DATED_STEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}-.+").expect("dated stem pattern is valid"));

/// Extensions accepted for articles, compared case-insensitively.
pub const ALLOWED_EXTENSIONS: [&str; 6] = [".md", ".markdown", ".rmd", ".rmarkdown", ".txt", ".ipynb"];

/// Registry file first-time contributors are asked to update.
pub const CONTRIBUTOR_REGISTRY: &str = "data/members.yaml";

const REGISTRY_REMINDER_TITLE: &str = "Add `data/members.yaml`";
const LOCATION_TITLE_PREFIX: &str = "Location";
const FILENAME_TITLE: &str = "Filename problems";
const CONTENT_TITLE: &str = "Content problems";

/// The pull request facts the checker needs.
#[derive(Debug, Clone, Copy)]
pub struct Submission<'a> {
    /// Thread the report is posted to.
    pub target: &'a IssueTarget,
    /// Login of the pull request author.
    pub author: &'a str,
    /// Whether the author has never contributed before.
    pub first_time_contributor: bool,
}

/// Result of checking one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionOutcome {
    /// Whether a report comment was posted.
    pub commented: bool,
    /// The problems found; empty for a clean submission.
    pub report: MessageTree,
}

/// Checks article files added or changed by a pull request.
#[derive(Debug, Clone)]
pub struct SubmissionChecker {
    posts_prefix: String,
}

impl SubmissionChecker {
    /// Creates a checker for articles stored under `posts_prefix`.
    pub fn new(posts_prefix: impl Into<String>) -> Self {
        Self {
            posts_prefix: posts_prefix.into(),
        }
    }

    /// Checks `files`, posting one report comment if anything is wrong.
    ///
    /// # Errors
    ///
    /// Propagates gateway failures from fetching file content or posting the
    /// comment.
    pub async fn check(
        &self,
        submission: Submission<'_>,
        files: &[ChangedFile],
        gateway: &dyn GitHubGateway,
    ) -> Result<SubmissionOutcome, GitHubError> {
        let articles: Vec<&ChangedFile> = files
            .iter()
            .filter(|file| !file.removed && file.path.starts_with(&self.posts_prefix))
            .collect();
        if articles.is_empty() {
            debug!(target = %submission.target, "no article files in pull request");
            return Ok(SubmissionOutcome {
                commented: false,
                report: MessageTree::new(),
            });
        }

        let mut report = MessageTree::new();

        if submission.first_time_contributor
            && !files.iter().any(|file| file.path == CONTRIBUTOR_REGISTRY)
        {
            report.insert_leaf(
                REGISTRY_REMINDER_TITLE,
                format!(
                    "It looks like this is your first submission. You may want to add \
                     your details to `{CONTRIBUTOR_REGISTRY}` in this pull request as well."
                ),
            );
        }

        for article in articles {
            let Some(relative) = self.relative_path(&article.path) else {
                continue;
            };

            let mut problems = check_path(&article.path, relative);

            let text = gateway.file_content(article).await?;
            let content_problems = content::validate(&text);
            if !content_problems.is_empty() {
                problems.insert_leaf(CONTENT_TITLE, content_problems);
            }

            if !problems.is_empty() {
                report.insert_branch(format!("File `{}` problems", article.path), problems);
            }
        }

        if report.is_empty() {
            info!(target = %submission.target, "submission is clean");
            return Ok(SubmissionOutcome {
                commented: false,
                report,
            });
        }

        let comment = render_report(submission.author, &report);
        gateway.create_comment(submission.target, &comment).await?;
        info!(target = %submission.target, "posted submission report");

        Ok(SubmissionOutcome {
            commented: true,
            report,
        })
    }

    /// Path below the prefix, or `None` for the prefix itself.
    fn relative_path<'p>(&self, path: &'p str) -> Option<&'p str> {
        let relative = path[self.posts_prefix.len()..].trim_start_matches('/');
        (!relative.is_empty()).then_some(relative)
    }
}

/// Nesting depth, extension and file name checks for one article.
fn check_path(path: &str, relative: &str) -> MessageTree {
    let mut problems = MessageTree::new();

    if relative.contains('/') {
        problems.insert_leaf(
            format!("{LOCATION_TITLE_PREFIX}: {path}"),
            "Articles should sit directly in the posts directory, not in a \
             subdirectory. Ignore this if the file is not an article.",
        );
    }

    let file_name = Path::new(path);
    let stem = file_name
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default();
    let extension = file_name
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
        .unwrap_or_default();

    let mut filename_warning = String::new();
    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        filename_warning.push_str(&format!(
            "Only these file types are allowed: {}\n\n",
            ALLOWED_EXTENSIONS.join(", ")
        ));
    }
    if !DATED_STEM.is_match(stem) {
        filename_warning
            .push_str("File names should look like `2018-01-01-something.md`.\n\n");
    }
    if !filename_warning.is_empty() {
        problems.insert_leaf(FILENAME_TITLE, filename_warning.trim_end());
    }

    problems
}
