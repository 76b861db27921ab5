//! Loop-safe replies to `@bot` mentions in comments and issue bodies.
//!
//! A reply fires at most once per distinct mention: an edit only triggers a
//! reply when the previous text did not already mention the bot. The bot
//! never answers itself.

use regex::Regex;

use crate::{Login, ReactionError};

/// Number of body lines quoted in a reply.
const QUOTED_LINES: usize = 3;

/// Event family the text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MentionSource {
    /// `issue_comment` events; reacts to `created` and `edited`.
    Comment,
    /// `issues` events; reacts to `opened` and `edited`.
    IssueBody,
}

impl MentionSource {
    fn creation_action(self) -> &'static str {
        match self {
            Self::Comment => "created",
            Self::IssueBody => "opened",
        }
    }
}

/// The text under consideration and its history.
#[derive(Debug, Clone, Copy)]
pub struct MentionContext<'a> {
    /// Where the text lives.
    pub source: MentionSource,
    /// Webhook action.
    pub action: &'a str,
    /// Current text.
    pub body: &'a str,
    /// Text before an edit, when GitHub recorded it.
    pub previous_body: Option<&'a str>,
    /// Login of the text's author.
    pub author: &'a str,
}

/// Decides whether a mention deserves a reply and builds it.
#[derive(Debug, Clone)]
pub struct MentionResponder {
    bot: Login,
    pattern: Regex,
}

impl MentionResponder {
    /// Creates a responder for the given bot account.
    ///
    /// # Errors
    ///
    /// Returns [`ReactionError::Configuration`] if the mention pattern cannot
    /// be compiled for this login.
    pub fn new(bot: Login) -> Result<Self, ReactionError> {
        let pattern = Regex::new(&format!(
            r"(?i)(?:^|[^a-zA-Z0-9])@{}(?:[^a-zA-Z0-9]|$)",
            regex::escape(bot.as_str())
        ))
        .map_err(|error| ReactionError::Configuration {
            message: format!("cannot build mention pattern for '{bot}': {error}"),
        })?;
        Ok(Self { bot, pattern })
    }

    /// Returns `true` if `text` mentions the bot as a whole word, ignoring case.
    pub fn mentions_bot(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    /// Returns the reply to post, or `None` if this event must stay silent.
    pub fn respond(&self, context: &MentionContext<'_>) -> Option<String> {
        if self.bot.is_same_account(context.author) {
            return None;
        }

        let newly_mentioned = if context.action == context.source.creation_action() {
            self.mentions_bot(context.body)
        } else if context.action == "edited" {
            match context.previous_body {
                Some(previous) if self.mentions_bot(previous) => false,
                _ => self.mentions_bot(context.body),
            }
        } else {
            false
        };

        newly_mentioned.then(|| quote_reply(context.body, context.author))
    }
}

/// Quotes the first lines of `body` and appends a short reply to `author`.
fn quote_reply(body: &str, author: &str) -> String {
    let lines: Vec<&str> = body.split('\n').collect();
    let mut quoted = lines
        .iter()
        .take(QUOTED_LINES)
        .map(|line| format!("> {line}"))
        .collect::<Vec<_>>()
        .join("\n");
    if lines.len() > QUOTED_LINES {
        quoted.push_str("\n> ...");
    }
    format!("{quoted}\n\nHi @{author} you mentioned me!\nBut I am too busy right now.")
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn responder() -> MentionResponder {
        MentionResponder::new(Login::new("bot").unwrap()).unwrap()
    }

    fn comment<'a>(action: &'a str, body: &'a str, previous: Option<&'a str>) -> MentionContext<'a> {
        MentionContext {
            source: MentionSource::Comment,
            action,
            body,
            previous_body: previous,
            author: "alice",
        }
    }

    #[rstest]
    #[case::plain("hi @bot", true)]
    #[case::start_of_text("@bot hello", true)]
    #[case::punctuation("(@bot)", true)]
    #[case::newline("thanks\n@bot\n", true)]
    #[case::other_case("hi @Bot", true)]
    #[case::longer_login("hi @bot2", false)]
    #[case::email("mail me at me@bot.example", false)]
    #[case::suffix("hi @robot", false)]
    #[case::no_mention("hi there", false)]
    fn detects_whole_word_mentions(
        responder: MentionResponder,
        #[case] text: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(responder.mentions_bot(text), expected);
    }

    #[rstest]
    fn created_comment_with_mention_gets_reply(responder: MentionResponder) {
        let reply = responder.respond(&comment("created", "hi @bot", None)).unwrap();
        assert_eq!(
            reply,
            "> hi @bot\n\nHi @alice you mentioned me!\nBut I am too busy right now."
        );
    }

    #[rstest]
    fn edit_of_already_mentioning_text_stays_silent(responder: MentionResponder) {
        let context = comment("edited", "hi @bot again", Some("hi @bot"));
        assert_eq!(responder.respond(&context), None);
    }

    #[rstest]
    fn edit_introducing_mention_gets_reply(responder: MentionResponder) {
        let context = comment("edited", "hi @bot", Some("hi"));
        assert!(responder.respond(&context).is_some());
    }

    #[rstest]
    fn edit_without_recorded_previous_body_counts_as_new(responder: MentionResponder) {
        assert!(responder.respond(&comment("edited", "hi @bot", None)).is_some());
        assert!(responder.respond(&comment("edited", "hi", None)).is_none());
    }

    #[rstest]
    fn bot_never_answers_itself(responder: MentionResponder) {
        let mut context = comment("created", "hi @bot", None);
        context.author = "Bot";
        assert_eq!(responder.respond(&context), None);
    }

    #[rstest]
    #[case::deleted_comment(MentionSource::Comment, "deleted")]
    #[case::opened_is_not_a_comment_action(MentionSource::Comment, "opened")]
    #[case::created_is_not_an_issue_action(MentionSource::IssueBody, "created")]
    #[case::closed_issue(MentionSource::IssueBody, "closed")]
    fn other_actions_are_ignored(
        responder: MentionResponder,
        #[case] source: MentionSource,
        #[case] action: &str,
    ) {
        let mut context = comment(action, "hi @bot", None);
        context.source = source;
        assert_eq!(responder.respond(&context), None);
    }

    #[rstest]
    fn opened_issue_with_mention_gets_reply(responder: MentionResponder) {
        let mut context = comment("opened", "@bot help", None);
        context.source = MentionSource::IssueBody;
        assert!(responder.respond(&context).is_some());
    }

    #[rstest]
    fn long_bodies_are_truncated_in_the_quote(responder: MentionResponder) {
        let reply = responder
            .respond(&comment("created", "one\ntwo @bot\nthree\nfour", None))
            .unwrap();
        assert!(reply.starts_with("> one\n> two @bot\n> three\n> ...\n\nHi @alice"));
        assert!(!reply.contains("four"));
    }
}
