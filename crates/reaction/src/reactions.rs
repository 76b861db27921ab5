//! The reactions bound to webhook events.
//!
//! Each reaction reads a typed view of the payload, applies its guards and
//! calls the checker or responder. Guards that decide "nothing to do" return
//! [`ReactionOutcome::Skipped`]; only real failures become errors.

use std::sync::Arc;

use tracing::{debug, info};

use crate::event::{previous_body, IssueCommentPayload, IssuesPayload, PullRequestPayload};
use crate::mention::{MentionContext, MentionResponder, MentionSource};
use crate::submission::{Submission, SubmissionChecker};
use crate::{resolve, GitHubGateway, IssueTarget, Login, ReactionError, WebhookEvent};

/// What a reaction did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReactionOutcome {
    /// A guard decided there was nothing to do.
    Skipped {
        /// Why the reaction stopped.
        reason: &'static str,
    },
    /// The reaction ran to completion.
    Completed {
        /// Number of comments posted.
        comments_posted: usize,
    },
}

/// Shared state of every reaction.
pub(crate) struct Reactor {
    pub(crate) gateway: Arc<dyn GitHubGateway>,
    pub(crate) bot: Login,
    pub(crate) checker: SubmissionChecker,
    pub(crate) responder: MentionResponder,
}

impl Reactor {
    /// Greets first-time contributors and checks article submissions.
    pub(crate) async fn on_pull_request(
        &self,
        event: &WebhookEvent,
    ) -> Result<ReactionOutcome, ReactionError> {
        let payload: PullRequestPayload = event.view()?;
        let pull_request = &payload.pull_request;
        let author = pull_request.user.login.as_str();

        if self.bot.is_same_account(author) {
            return Ok(skipped("pull request opened by the bot itself"));
        }
        if payload.action != "opened" {
            return Ok(skipped("pull request action is not 'opened'"));
        }
        let Some(target) = resolve(&pull_request.url).and_then(|r| r.issue_target()) else {
            return Ok(skipped("pull request URL cannot be resolved"));
        };

        let mut comments_posted = 0;
        let first_time_contributor = pull_request.is_first_time_contributor();
        if first_time_contributor {
            self.greet(&target, author).await?;
            comments_posted += 1;
        }

        let files = self.gateway.pull_request_files(&target).await?;
        debug!(%target, files = files.len(), "fetched pull request files");
        let outcome = self
            .checker
            .check(
                Submission {
                    target: &target,
                    author,
                    first_time_contributor,
                },
                &files,
                self.gateway.as_ref(),
            )
            .await?;
        if outcome.commented {
            comments_posted += 1;
        }

        Ok(ReactionOutcome::Completed { comments_posted })
    }

    /// Answers mentions in a new or edited comment.
    pub(crate) async fn on_issue_comment(
        &self,
        event: &WebhookEvent,
    ) -> Result<ReactionOutcome, ReactionError> {
        let payload: IssueCommentPayload = event.view()?;
        let context = MentionContext {
            source: MentionSource::Comment,
            action: &payload.action,
            body: &payload.comment.body,
            previous_body: previous_body(payload.changes.as_ref(), &payload.comment.body),
            author: &payload.comment.user.login,
        };
        self.answer_mention(&context, &payload.issue.url).await
    }

    /// Answers mentions in a new or edited issue body.
    pub(crate) async fn on_issues(
        &self,
        event: &WebhookEvent,
    ) -> Result<ReactionOutcome, ReactionError> {
        let payload: IssuesPayload = event.view()?;
        let body = payload.issue.body.as_deref().unwrap_or_default();
        let context = MentionContext {
            source: MentionSource::IssueBody,
            action: &payload.action,
            body,
            previous_body: previous_body(payload.changes.as_ref(), body),
            author: &payload.issue.user.login,
        };
        self.answer_mention(&context, &payload.issue.url).await
    }

    async fn answer_mention(
        &self,
        context: &MentionContext<'_>,
        issue_url: &str,
    ) -> Result<ReactionOutcome, ReactionError> {
        let Some(reply) = self.responder.respond(context) else {
            return Ok(skipped("no new mention of the bot"));
        };
        let Some(target) = resolve(issue_url).and_then(|r| r.issue_target()) else {
            return Ok(skipped("issue URL cannot be resolved"));
        };

        self.gateway.create_comment(&target, &reply).await?;
        info!(%target, author = context.author, "replied to mention");
        Ok(ReactionOutcome::Completed { comments_posted: 1 })
    }

    async fn greet(&self, target: &IssueTarget, author: &str) -> Result<(), ReactionError> {
        let greeting = format!(
            "@{author}\nHi, it seems that this is your first contribution here. Welcome!"
        );
        self.gateway.create_comment(target, &greeting).await?;
        info!(%target, author, "greeted first-time contributor");
        Ok(())
    }
}

fn skipped(reason: &'static str) -> ReactionOutcome {
    debug!(reason, "reaction skipped");
    ReactionOutcome::Skipped { reason }
}
