//! Confirmation matcher: replies under our soft-asks.

use super::{Gateway, Outcome};
use chrono::{DateTime, Utc};
use herald_core::{
    error::{HeraldError, SkipReason},
    message::InboundEvent,
};
use herald_memory::{audit::DeliveryKind, day_key, PendingOffer};
use tracing::{debug, error, info};

impl Gateway {
    /// `prompt_id` is the bare id of the comment this event replies to.
    ///
    /// On delivery failure the offer is kept so the author can confirm again.
    pub(super) async fn match_confirmation(
        &self,
        event: &InboundEvent,
        prompt_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Outcome, HeraldError> {
        let Some(offer) = self.memory.pending_by_prompt(prompt_id).await? else {
            return Ok(Outcome::Skipped(SkipReason::NoPendingOffer));
        };

        if offer.is_expired(now) {
            self.memory.delete_pending_by_prompt(prompt_id).await?;
            info!(
                "offer {} for orig {} expired before u/{} replied",
                prompt_id, offer.orig_item_id, event.author
            );
            return Ok(Outcome::Skipped(SkipReason::PendingExpired));
        }

        if !event.is_authored_by(&offer.orig_author)
            || !self.classifier.matches_affirmative(&event.body)
        {
            debug!(
                "reply {} under prompt {} is not a confirmation (author u/{}, expected u/{})",
                event.id, prompt_id, event.author, offer.orig_author
            );
            return Ok(Outcome::Skipped(SkipReason::PendingMismatch));
        }

        info!(
            "Received confirmation from original author u/{} for orig {}",
            event.author, offer.orig_item_id
        );

        let text = self.outreach.full_reply_text();
        let delivered = match self.executor.deliver(event, &text).await {
            Ok(d) => d,
            Err(failure) => {
                error!(
                    "Failed to post full reply after confirmation {}: {failure}",
                    event.id
                );
                self.log_delivery(DeliveryKind::Conversion, event, None, Some(&failure))
                    .await;
                self.notices
                    .error(&failure.to_string(), Some(&event.id), Some(&event.channel))
                    .await;
                return Ok(Outcome::DeliveryFailed(failure));
            }
        };

        if let Err(e) = self.record_conversion(&offer, event, now).await {
            return Err(HeraldError::Memory(format!(
                "known inconsistency: full reply {} posted for orig {} without bookkeeping: {e}",
                delivered.id, offer.orig_item_id
            )));
        }

        self.log_delivery(DeliveryKind::Conversion, event, Some(&delivered.id), None)
            .await;
        self.notices.conversion(event, &offer.orig_item_id).await;

        Ok(Outcome::Converted {
            orig_item_id: offer.orig_item_id,
        })
    }

    async fn record_conversion(
        &self,
        offer: &PendingOffer,
        event: &InboundEvent,
        now: DateTime<Utc>,
    ) -> Result<(), HeraldError> {
        self.memory.mark_replied(&offer.orig_item_id, now).await?;
        self.memory
            .increment_day_count(&day_key(now), &event.channel)
            .await?;
        self.memory.delete_pending_by_prompt(&offer.prompt_id).await?;
        Ok(())
    }
}
