//! Prompt issuer: decide whether a fresh event gets a soft-ask.

use super::{Gateway, Outcome};
use chrono::{DateTime, Utc};
use herald_core::{
    error::{HeraldError, SkipReason},
    intent::is_trigger_candidate,
    message::{DeliveredRef, InboundEvent},
};
use herald_memory::{audit::DeliveryKind, day_key, PendingOffer};
use tracing::{debug, error, info};

impl Gateway {
    /// Preconditions short-circuit in order: dedup, filter, live offer,
    /// earlier prompt (when re-prompting is off), daily quota.
    pub(super) async fn issue_prompt(
        &self,
        event: &InboundEvent,
        now: DateTime<Utc>,
    ) -> Result<Outcome, HeraldError> {
        if self.memory.has_replied(&event.id).await? {
            return Ok(Outcome::Skipped(SkipReason::DuplicateItem));
        }

        if !is_trigger_candidate(
            self.classifier.as_ref(),
            &event.body,
            self.outreach.min_body_len,
        ) {
            return Ok(Outcome::Skipped(SkipReason::FilterMiss));
        }

        if let Some(offer) = self.memory.pending_by_orig(&event.id).await? {
            if !offer.is_expired(now) {
                debug!("{} already has live offer {}", event.id, offer.prompt_id);
                return Ok(Outcome::Skipped(SkipReason::AlreadyPending));
            }
        }

        if !self.outreach.reprompt_after_expiry && self.memory.was_prompted(&event.id).await? {
            return Ok(Outcome::Skipped(SkipReason::AlreadyPrompted));
        }

        let today = day_key(now);
        let count = self.memory.day_count(&today, &event.channel).await?;
        if count >= self.outreach.max_prompts_per_day {
            info!(
                "Skipping {} because daily limit reached for r/{} ({count}/{})",
                event.id, event.channel, self.outreach.max_prompts_per_day
            );
            return Ok(Outcome::Skipped(SkipReason::QuotaExceeded));
        }

        let expires_at = self.outreach.offer_expiry(now).ok_or_else(|| {
            HeraldError::Config(format!(
                "soft_ask_expire_hours={} overflows the offer expiry",
                self.outreach.soft_ask_expire_hours
            ))
        })?;

        let delivered = match self.executor.deliver(event, &self.outreach.soft_prompt).await {
            Ok(d) => d,
            Err(failure) => {
                error!("Failed to post soft prompt for {}: {failure}", event.id);
                self.log_delivery(DeliveryKind::Prompt, event, None, Some(&failure))
                    .await;
                self.notices
                    .error(&failure.to_string(), Some(&event.id), Some(&event.channel))
                    .await;
                return Ok(Outcome::DeliveryFailed(failure));
            }
        };

        if let Err(e) = self
            .record_prompt(event, &delivered, &today, now, expires_at)
            .await
        {
            return Err(HeraldError::Memory(format!(
                "known inconsistency: soft prompt {} posted for {} without bookkeeping: {e}",
                delivered.id, event.id
            )));
        }

        info!(
            "Posted soft prompt {} in r/{} for orig {}",
            delivered.id, event.channel, event.id
        );
        self.log_delivery(DeliveryKind::Prompt, event, Some(&delivered.id), None)
            .await;
        self.notices.prompt_posted(event).await;

        Ok(Outcome::Prompted {
            prompt_id: delivered.id,
        })
    }

    async fn record_prompt(
        &self,
        event: &InboundEvent,
        delivered: &DeliveredRef,
        today: &str,
        now: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<(), HeraldError> {
        self.memory
            .upsert_pending(&PendingOffer {
                orig_item_id: event.id.clone(),
                orig_author: event.author.clone(),
                prompt_id: delivered.id.clone(),
                expires_at,
            })
            .await?;
        self.memory
            .increment_day_count(today, &event.channel)
            .await?;
        self.memory.mark_prompted(&event.id, now).await?;
        Ok(())
    }
}
