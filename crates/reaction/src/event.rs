//! Inbound webhook events and the narrow payload views reactions read.
//!
//! Payloads are not validated against a schema. Each reaction deserialises
//! only the fields it needs; anything else in the payload is ignored.

use serde::Deserialize;
use serde_json::Value;

use crate::ReactionError;

/// One webhook delivery as seen by the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookEvent {
    /// Event name from the `X-GitHub-Event` header (e.g. `"pull_request"`).
    pub name: String,
    /// The payload's `action` field; empty when absent.
    pub action: String,
    /// The full JSON payload.
    pub payload: Value,
}

impl WebhookEvent {
    /// Wraps a payload, reading its `action` defensively.
    pub fn new(name: impl Into<String>, payload: Value) -> Self {
        let action = payload
            .get("action")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        Self {
            name: name.into(),
            action,
            payload,
        }
    }

    /// Deserialises a typed view of the payload.
    pub fn view<'a, T: Deserialize<'a>>(&'a self) -> Result<T, ReactionError> {
        T::deserialize(&self.payload).map_err(|source| ReactionError::MalformedPayload {
            event: self.name.clone(),
            source,
        })
    }
}

/// A GitHub account as embedded in payloads.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Account {
    /// Account login.
    pub login: String,
}

/// `changes` object of an `edited` action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Changes {
    /// Previous body, present only when the body was edited.
    #[serde(default)]
    pub body: Option<PreviousValue>,
}

/// The `from` value of a changed field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PreviousValue {
    /// Value before the edit.
    pub from: String,
}

// ---------------------------------------------------------------------------
// pull_request
// ---------------------------------------------------------------------------

/// View of a `pull_request` payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PullRequestPayload {
    /// Event action (e.g. `"opened"`).
    pub action: String,
    /// The pull request.
    pub pull_request: PullRequestDetails,
}

/// The fields of a pull request the engine reads.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PullRequestDetails {
    /// REST API URL of the pull request.
    pub url: String,
    /// Author.
    pub user: Account,
    /// Author's relationship with the repository (`"NONE"` for first-timers).
    pub author_association: String,
}

impl PullRequestDetails {
    /// Returns `true` if the author has never contributed to the repository.
    pub fn is_first_time_contributor(&self) -> bool {
        self.author_association.eq_ignore_ascii_case("NONE")
    }
}

// ---------------------------------------------------------------------------
// issue_comment / issues
// ---------------------------------------------------------------------------

/// View of an `issue_comment` payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IssueCommentPayload {
    /// Event action (e.g. `"created"`).
    pub action: String,
    /// Issue (or pull request) the comment belongs to.
    pub issue: IssueLink,
    /// The comment.
    pub comment: CommentDetails,
    /// Present on `edited` actions.
    #[serde(default)]
    pub changes: Option<Changes>,
}

/// Minimal issue reference carried by comment payloads.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IssueLink {
    /// REST API URL of the issue.
    pub url: String,
}

/// The fields of a comment the engine reads.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommentDetails {
    /// Comment text.
    pub body: String,
    /// Author.
    pub user: Account,
}

/// View of an `issues` payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IssuesPayload {
    /// Event action (e.g. `"opened"`).
    pub action: String,
    /// The issue.
    pub issue: IssueDetails,
    /// Present on `edited` actions.
    #[serde(default)]
    pub changes: Option<Changes>,
}

/// The fields of an issue the engine reads.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IssueDetails {
    /// REST API URL of the issue.
    pub url: String,
    /// Issue text; GitHub sends `null` for an empty body.
    #[serde(default)]
    pub body: Option<String>,
    /// Author.
    pub user: Account,
}

/// Returns the body as it read before this delivery.
///
/// `None` means GitHub sent no `changes` at all. A `changes` object without a
/// `body` entry records an edit of some other field, so the body is `current`.
pub fn previous_body<'a>(changes: Option<&'a Changes>, current: &'a str) -> Option<&'a str> {
    changes.map(|changes| {
        changes
            .body
            .as_ref()
            .map_or(current, |previous| previous.from.as_str())
    })
}
