//! Inbound message moderation.
//!
//! Each message-posted/edited event is checked against the moderation
//! service. A flagged message is deleted and its author gets an ephemeral
//! notice carrying the service's cleaned text. No retries; the caller
//! logs failures and drops the event.

use crate::error::Result;
use crate::services::{ModerationApi, Notifier};

/// Fixed removal notice template. `{message}` is replaced with the
/// moderation service's cleaned text.
pub const REMOVAL_NOTICE: &str =
    "Your message `{message}` was removed because it had bad words.";

/// An inbound message-posted or message-edited event.
#[derive(Debug, Clone)]
pub struct MessageEvent {
    /// Channel the message was posted in
    pub channel: String,

    /// Author user id
    pub user: String,

    /// Message timestamp (Slack's message identifier within a channel)
    pub ts: String,

    /// Message text
    pub text: String,
}

/// Outcome of moderating one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationOutcome {
    /// Event carried no text to check
    Skipped,
    /// Text passed the check
    Clean,
    /// Message was deleted and the author notified
    Removed,
}

/// Moderates inbound message events.
pub struct Moderator<'a> {
    api: &'a dyn ModerationApi,
    notifier: &'a dyn Notifier,
}

impl<'a> Moderator<'a> {
    pub fn new(api: &'a dyn ModerationApi, notifier: &'a dyn Notifier) -> Self {
        Self { api, notifier }
    }

    /// Check one event and remove the message when it is flagged.
    pub async fn handle(&self, event: &MessageEvent) -> Result<ModerationOutcome> {
        if event.text.trim().is_empty() {
            return Ok(ModerationOutcome::Skipped);
        }

        let verdict = self.api.check(&event.text).await?;
        if !verdict.bad_words {
            return Ok(ModerationOutcome::Clean);
        }

        log::info!(
            "Removing flagged message {} in {} from {}",
            event.ts,
            event.channel,
            event.user
        );

        self.notifier
            .delete_message(&event.channel, &event.ts)
            .await?;

        let notice = REMOVAL_NOTICE.replace("{message}", &verdict.clean);
        self.notifier
            .post_ephemeral(&event.channel, &event.user, &notice)
            .await?;

        Ok(ModerationOutcome::Removed)
    }
}
