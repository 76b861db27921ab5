//! Event reaction engine for Steward.
//!
//! This crate decides how the bot reacts to GitHub webhook deliveries for a
//! blog repository: it routes events, checks article submissions, answers
//! mentions without looping, and reports every delivery as a
//! [`DispatchResult`]. Infrastructure crates implement [`GitHubGateway`];
//! they never add reaction rules.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* is needed from GitHub; the `github` crate defines *how*
//! to supply it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`RepositoryOwner`, `Login`, etc.) |
//! | [`resource`] | URL resolution into [`ResourceRef`] / [`IssueTarget`] |
//! | [`content`] | Article front matter and body validation |
//! | [`message`] | Nested feedback messages and markdown rendering |
//! | [`submission`] | Pull request article checks |
//! | [`mention`] | Loop-safe mention replies |
//! | [`event`] | Webhook event wrapper and payload views |
//! | [`port`] | The [`GitHubGateway`] trait |
//! | [`dispatch`] | Event routing and [`DispatchResult`] |
//! | [`errors`] | Error types |

pub mod content;
pub mod dispatch;
pub mod errors;
pub mod event;
pub mod identifiers;
pub mod mention;
pub mod message;
pub mod port;
mod reactions;
pub mod resource;
pub mod submission;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use dispatch::{DispatchResult, DispatchStatus, Dispatcher, ReactionConfig};
pub use errors::{GitHubError, ReactionError};
pub use event::WebhookEvent;
pub use identifiers::{IssueNumber, Login, RepositoryName, RepositoryOwner};
pub use message::{render_report, MessageNode, MessageTree};
pub use port::{ChangedFile, GitHubGateway};
pub use reactions::ReactionOutcome;
pub use resource::{resolve, IssueTarget, ResourceRef};
