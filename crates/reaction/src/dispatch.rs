//! Routing of webhook events to reactions.
//!
//! The [`Dispatcher`] owns an explicit table from event name to reaction,
//! built once at construction. Every dispatch ends in exactly one of three
//! states:
//!
//! | State | `status` | When |
//! |-------|----------|------|
//! | not implemented | `ok` | no reaction is bound to the event name |
//! | handled | `ok` | the reaction returned `Ok`, whatever it decided |
//! | failed | `error` | the reaction returned `Err` |
//!
//! Reaction errors are logged here and never leave the dispatcher.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, info_span, Instrument};

use crate::mention::MentionResponder;
use crate::reactions::{ReactionOutcome, Reactor};
use crate::submission::SubmissionChecker;
use crate::{GitHubGateway, Login, ReactionError, WebhookEvent};

/// Engine configuration supplied by the host process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionConfig {
    /// The bot's own account; its activity never triggers a reaction.
    pub bot_login: Login,
    /// Path prefix under which articles live (e.g. `"content/post/"`).
    pub posts_prefix: String,
}

/// Coarse outcome of a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchStatus {
    /// Handled, or nothing to handle.
    Ok,
    /// The reaction failed.
    Error,
}

/// The structured result handed back to the transport layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchResult {
    /// Event name as delivered.
    pub event: String,
    /// Success or failure.
    pub status: DispatchStatus,
    /// Human-readable summary.
    pub data: String,
}

impl DispatchResult {
    fn not_implemented(event: &str) -> Self {
        Self {
            event: event.to_string(),
            status: DispatchStatus::Ok,
            data: format!("reaction for \"{event}\" is not implemented."),
        }
    }

    fn handled(event: &str) -> Self {
        Self {
            event: event.to_string(),
            status: DispatchStatus::Ok,
            data: format!("smooth for \"{event}\""),
        }
    }

    fn failed(event: &str) -> Self {
        Self {
            event: event.to_string(),
            status: DispatchStatus::Error,
            data: format!("something went wrong with \"{event}\""),
        }
    }

    /// Returns `true` for the `ok` status.
    pub fn is_ok(&self) -> bool {
        self.status == DispatchStatus::Ok
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reaction {
    PullRequest,
    IssueComment,
    Issues,
}

/// Routes webhook events to their reactions.
pub struct Dispatcher {
    reactor: Reactor,
    routes: HashMap<&'static str, Reaction>,
}

impl Dispatcher {
    /// Builds a dispatcher with the standard reaction table.
    ///
    /// # Errors
    ///
    /// Returns [`ReactionError::Configuration`] if the bot login cannot be
    /// turned into a mention pattern.
    pub fn new(
        gateway: Arc<dyn GitHubGateway>,
        config: ReactionConfig,
    ) -> Result<Self, ReactionError> {
        let responder = MentionResponder::new(config.bot_login.clone())?;
        let reactor = Reactor {
            gateway,
            bot: config.bot_login,
            checker: SubmissionChecker::new(config.posts_prefix),
            responder,
        };
        let routes = HashMap::from([
            ("pull_request", Reaction::PullRequest),
            ("issue_comment", Reaction::IssueComment),
            ("issues", Reaction::Issues),
        ]);
        Ok(Self { reactor, routes })
    }

    /// Runs the reaction bound to `event_name`, if any.
    pub async fn dispatch(&self, event_name: &str, payload: Value) -> DispatchResult {
        let Some(reaction) = self.routes.get(event_name).copied() else {
            info!(event = event_name, "no reaction bound to event");
            return DispatchResult::not_implemented(event_name);
        };

        let event = WebhookEvent::new(event_name, payload);
        let span = info_span!("reaction", event = %event.name, action = %event.action);
        match self.run(reaction, &event).instrument(span).await {
            Ok(outcome) => {
                info!(event = event_name, ?outcome, "reaction finished");
                DispatchResult::handled(event_name)
            }
            Err(err) => {
                error!(event = event_name, error = %err, details = ?err, "reaction failed");
                DispatchResult::failed(event_name)
            }
        }
    }

    async fn run(
        &self,
        reaction: Reaction,
        event: &WebhookEvent,
    ) -> Result<ReactionOutcome, ReactionError> {
        match reaction {
            Reaction::PullRequest => self.reactor.on_pull_request(event).await,
            Reaction::IssueComment => self.reactor.on_issue_comment(event).await,
            Reaction::Issues => self.reactor.on_issues(event).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};
    use serde_json::{json, Value};

    use super::*;
    use crate::testing::RecordingGateway;

    const CLEAN_ARTICLE: &str = "---\nmeta_extra: \"\"\nforum_id:\nauthor: alice\n\
categories: [notes]\ntags: [rust]\n---\n\nBody.\n";

    #[fixture]
    fn config() -> ReactionConfig {
        ReactionConfig {
            bot_login: Login::new("steward-bot").unwrap(),
            posts_prefix: "content/post/".to_string(),
        }
    }

    fn dispatcher(gateway: Arc<RecordingGateway>, config: ReactionConfig) -> Dispatcher {
        Dispatcher::new(gateway, config).unwrap()
    }

    fn pull_request(action: &str, author: &str, association: &str) -> Value {
        json!({
            "action": action,
            "number": 7,
            "pull_request": {
                "url": "https://api.github.com/repos/acme/blog/pulls/7",
                "html_url": "https://github.com/acme/blog/pull/7",
                "user": {"login": author},
                "author_association": association
            }
        })
    }

    fn comment(action: &str, author: &str, body: &str, from: Option<&str>) -> Value {
        let mut payload = json!({
            "action": action,
            "issue": {"url": "https://api.github.com/repos/acme/blog/issues/3"},
            "comment": {"body": body, "user": {"login": author}}
        });
        if let Some(from) = from {
            payload["changes"] = json!({"body": {"from": from}});
        }
        payload
    }

    #[rstest]
    #[case::ping("ping")]
    #[case::push("push")]
    #[case::empty("")]
    #[tokio::test]
    async fn unknown_events_are_not_implemented(config: ReactionConfig, #[case] name: &str) {
        let gateway = Arc::new(RecordingGateway::new());
        let result = dispatcher(gateway, config).dispatch(name, json!({})).await;

        assert_eq!(result.status, DispatchStatus::Ok);
        assert_eq!(result.event, name);
        assert!(result.data.contains("not implemented"));
    }

    #[rstest]
    #[tokio::test]
    async fn malformed_payload_is_an_error(config: ReactionConfig) {
        let gateway = Arc::new(RecordingGateway::new());
        let result = dispatcher(gateway, config)
            .dispatch("pull_request", json!({"action": "opened"}))
            .await;

        assert_eq!(result.status, DispatchStatus::Error);
        assert_eq!(result.data, "something went wrong with \"pull_request\"");
    }

    #[rstest]
    #[tokio::test]
    async fn gateway_failure_is_an_error(config: ReactionConfig) {
        let gateway = Arc::new(RecordingGateway::new().failing());
        let result = dispatcher(gateway, config)
            .dispatch("pull_request", pull_request("opened", "alice", "CONTRIBUTOR"))
            .await;

        assert!(!result.is_ok());
    }

    #[rstest]
    #[tokio::test]
    async fn clean_pull_request_is_handled_without_comment(config: ReactionConfig) {
        let gateway = Arc::new(
            RecordingGateway::new().with_file("content/post/2024-01-01-hello.md", CLEAN_ARTICLE),
        );
        let result = dispatcher(gateway.clone(), config)
            .dispatch("pull_request", pull_request("opened", "alice", "CONTRIBUTOR"))
            .await;

        assert_eq!(result.status, DispatchStatus::Ok);
        assert_eq!(result.data, "smooth for \"pull_request\"");
        assert!(gateway.comments().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn first_time_contributor_is_greeted_then_reminded(config: ReactionConfig) {
        let gateway = Arc::new(
            RecordingGateway::new().with_file("content/post/2024-01-01-hello.md", CLEAN_ARTICLE),
        );
        let result = dispatcher(gateway.clone(), config)
            .dispatch("pull_request", pull_request("opened", "alice", "NONE"))
            .await;

        assert!(result.is_ok());
        let comments = gateway.comments();
        assert_eq!(comments.len(), 2);
        assert!(comments[0].1.starts_with("@alice\nHi, it seems"));
        assert!(comments[1].1.contains("data/members.yaml"));
        assert_eq!(comments[1].0.number.as_u64(), 7);
    }

    #[rstest]
    #[case::bot_author(pull_request("opened", "steward-bot", "NONE"))]
    #[case::synchronize(pull_request("synchronize", "alice", "NONE"))]
    #[tokio::test]
    async fn guarded_pull_requests_post_nothing(config: ReactionConfig, #[case] payload: Value) {
        let gateway = Arc::new(
            RecordingGateway::new().with_file("content/post/hello.md", "no front matter"),
        );
        let result = dispatcher(gateway.clone(), config)
            .dispatch("pull_request", payload)
            .await;

        assert!(result.is_ok());
        assert!(gateway.comments().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn unresolvable_pull_request_url_is_skipped(config: ReactionConfig) {
        let gateway = Arc::new(RecordingGateway::new().failing());
        let mut payload = pull_request("opened", "alice", "NONE");
        payload["pull_request"]["url"] = json!("https://example.com/acme/blog/pulls/7");

        let result = dispatcher(gateway, config)
            .dispatch("pull_request", payload)
            .await;

        assert!(result.is_ok());
    }

    #[rstest]
    #[tokio::test]
    async fn mention_is_answered_once(config: ReactionConfig) {
        let gateway = Arc::new(RecordingGateway::new());
        let dispatcher = dispatcher(gateway.clone(), config);

        let created = dispatcher
            .dispatch("issue_comment", comment("created", "alice", "hi @steward-bot", None))
            .await;
        let edited = dispatcher
            .dispatch(
                "issue_comment",
                comment("edited", "alice", "hi @steward-bot again", Some("hi @steward-bot")),
            )
            .await;

        assert!(created.is_ok());
        assert!(edited.is_ok());
        let comments = gateway.comments();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].0.number.as_u64(), 3);
        assert!(comments[0].1.contains("Hi @alice you mentioned me!"));
    }

    #[rstest]
    #[tokio::test]
    async fn bot_comments_never_trigger_replies(config: ReactionConfig) {
        let gateway = Arc::new(RecordingGateway::new());
        let result = dispatcher(gateway.clone(), config)
            .dispatch(
                "issue_comment",
                comment("created", "steward-bot", "> hi @steward-bot", None),
            )
            .await;

        assert!(result.is_ok());
        assert!(gateway.comments().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn issue_body_mention_is_answered(config: ReactionConfig) {
        let gateway = Arc::new(RecordingGateway::new());
        let payload = json!({
            "action": "opened",
            "issue": {
                "url": "https://api.github.com/repos/acme/blog/issues/9",
                "body": "@steward-bot can you help?",
                "user": {"login": "bob"}
            }
        });
        let result = dispatcher(gateway.clone(), config)
            .dispatch("issues", payload)
            .await;

        assert!(result.is_ok());
        assert_eq!(gateway.comments().len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn issue_title_edit_does_not_repeat_reply(config: ReactionConfig) {
        let gateway = Arc::new(RecordingGateway::new());
        let dispatcher = dispatcher(gateway.clone(), config);
        let issue = json!({
            "url": "https://api.github.com/repos/acme/blog/issues/9",
            "body": "@steward-bot help",
            "user": {"login": "bob"}
        });

        let opened = dispatcher
            .dispatch("issues", json!({"action": "opened", "issue": issue.clone()}))
            .await;
        for title in ["Help", "Help please"] {
            let edited = dispatcher
                .dispatch(
                    "issues",
                    json!({
                        "action": "edited",
                        "issue": issue.clone(),
                        "changes": {"title": {"from": title}}
                    }),
                )
                .await;
            assert!(edited.is_ok());
        }

        assert!(opened.is_ok());
        assert_eq!(gateway.comments().len(), 1);
    }

    #[test]
    fn result_serialises_with_lowercase_status() {
        let json = serde_json::to_value(DispatchResult::failed("push")).unwrap();
        assert_eq!(
            json,
            json!({"event": "push", "status": "error", "data": "something went wrong with \"push\""})
        );
    }
}
