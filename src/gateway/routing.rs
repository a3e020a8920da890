//! Classify each event once: confirmation candidate or fresh candidate.

use super::{Gateway, Outcome};
use chrono::{DateTime, Utc};
use herald_core::{
    error::{HeraldError, SkipReason},
    message::InboundEvent,
};

impl Gateway {
    /// Handle one event against the current time.
    pub async fn handle_event(&self, event: &InboundEvent) -> Result<Outcome, HeraldError> {
        self.handle_event_at(event, Utc::now()).await
    }

    /// Handle one event as of `now`.
    ///
    /// Replies to a comment go to the confirmation matcher and never fall
    /// through to the prompt issuer, whatever the matcher decides.
    pub async fn handle_event_at(
        &self,
        event: &InboundEvent,
        now: DateTime<Utc>,
    ) -> Result<Outcome, HeraldError> {
        if !event.has_author() {
            return Ok(Outcome::Skipped(SkipReason::MissingAuthor));
        }
        if event.is_authored_by(&self.identity) {
            return Ok(Outcome::Skipped(SkipReason::OwnEvent));
        }

        match event.reply_parent_id() {
            Some(parent_id) => self.match_confirmation(event, parent_id, now).await,
            None => self.issue_prompt(event, now).await,
        }
    }
}
