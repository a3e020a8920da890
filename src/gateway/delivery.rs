//! Delivery executor: bounded retry with failure-class-specific backoff.

use super::Notices;
use herald_core::{
    error::DeliveryFailure,
    message::{DeliveredRef, InboundEvent},
    traits::{Pause, Transport},
};
use rand::Rng;
use regex::Regex;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tracing::{info, warn};

/// Substrings of an API rejection that point at a ban or lockout.
const MODERATION_SIGNALS: &[&str] = &["BANNED", "SUSPENDED", "FORBIDDEN", "UNAUTHORIZED"];

/// Jitter added on top of a rate-limit wait, in seconds.
pub(super) const RATE_LIMIT_JITTER: std::ops::RangeInclusive<u64> = 2..=6;

/// Longest provider-requested wait honored, in seconds.
pub(super) const MAX_REQUESTED_WAIT_SECS: u64 = 3600;

/// Wraps a transport. One `deliver` call resolves fully before returning.
pub struct DeliveryExecutor {
    transport: Arc<dyn Transport>,
    pause: Arc<dyn Pause>,
    notices: Notices,
    max_attempts: u32,
    post_send_pause: Duration,
}

impl DeliveryExecutor {
    pub fn new(
        transport: Arc<dyn Transport>,
        pause: Arc<dyn Pause>,
        notices: Notices,
        max_attempts: u32,
        post_send_pause: Duration,
    ) -> Self {
        Self {
            transport,
            pause,
            notices,
            max_attempts: max_attempts.max(1),
            post_send_pause,
        }
    }

    pub fn transport_name(&self) -> &str {
        self.transport.name()
    }

    /// Reply to `target` with `text`, retrying up to the attempt budget.
    ///
    /// No wait follows the final failed attempt.
    pub async fn deliver(
        &self,
        target: &InboundEvent,
        text: &str,
    ) -> Result<DeliveredRef, DeliveryFailure> {
        let mut last = String::new();

        for attempt in 1..=self.max_attempts {
            let failure = match self.transport.deliver(target, text).await {
                Ok(delivered) => {
                    self.pause.pause(self.post_send_pause).await;
                    return Ok(delivered);
                }
                Err(failure) => reclassify(failure),
            };

            warn!(
                "delivery to {} failed (attempt {attempt}/{}): {failure}",
                target.id, self.max_attempts
            );
            if let DeliveryFailure::ModerationSuspected(detail) = &failure {
                self.notices.moderation(&target.channel, detail).await;
            }
            last = failure.to_string();

            if attempt == self.max_attempts {
                break;
            }
            let jitter = rand::thread_rng().gen_range(RATE_LIMIT_JITTER);
            let wait = backoff_for(&failure, attempt, jitter);
            info!("retrying delivery to {} in {}s", target.id, wait.as_secs());
            self.pause.pause(wait).await;
        }

        Err(DeliveryFailure::RetriesExhausted {
            attempts: self.max_attempts,
            last,
        })
    }
}

/// Promote API rejections that look like a ban to `ModerationSuspected`.
pub(super) fn reclassify(failure: DeliveryFailure) -> DeliveryFailure {
    match failure {
        DeliveryFailure::ApiError(detail) if is_moderation_signal(&detail) => {
            DeliveryFailure::ModerationSuspected(detail)
        }
        other => other,
    }
}

pub(super) fn is_moderation_signal(detail: &str) -> bool {
    let upper = detail.to_uppercase();
    MODERATION_SIGNALS.iter().any(|s| upper.contains(s))
}

/// Wait before attempt `attempt + 1`. `jitter` is in seconds and only applies
/// to rate limits.
pub(super) fn backoff_for(failure: &DeliveryFailure, attempt: u32, jitter: u64) -> Duration {
    let attempt = u64::from(attempt);
    let secs = match failure {
        DeliveryFailure::RateLimited(detail) => parse_requested_wait(detail)
            .unwrap_or_else(|| 60u64.saturating_mul(attempt))
            .saturating_add(jitter),
        DeliveryFailure::ServerTransient(_) => 30,
        DeliveryFailure::ApiError(_) | DeliveryFailure::ModerationSuspected(_) => {
            5u64.saturating_mul(attempt)
        }
        DeliveryFailure::Unknown(_) | DeliveryFailure::RetriesExhausted { .. } => {
            10u64.saturating_mul(attempt)
        }
    };
    Duration::from_secs(secs)
}

/// Wait the provider asked for, in seconds, capped at
/// `MAX_REQUESTED_WAIT_SECS`. Minutes win over seconds.
pub(super) fn parse_requested_wait(detail: &str) -> Option<u64> {
    let secs = if let Some(caps) = minutes_regex().captures(detail) {
        parse_digits(&caps[1]).saturating_mul(60)
    } else {
        parse_digits(&seconds_regex().captures(detail)?[1])
    };
    Some(secs.min(MAX_REQUESTED_WAIT_SECS))
}

/// Digits too long for u64 saturate instead of failing.
fn parse_digits(digits: &str) -> u64 {
    digits.parse::<u64>().unwrap_or(u64::MAX)
}

fn minutes_regex() -> &'static Regex {
    static MINUTES_RE: OnceLock<Regex> = OnceLock::new();
    MINUTES_RE.get_or_init(|| {
        Regex::new(r"(?i)(\d+)\s*minutes?").expect("minutes regex must compile")
    })
}

fn seconds_regex() -> &'static Regex {
    static SECONDS_RE: OnceLock<Regex> = OnceLock::new();
    SECONDS_RE.get_or_init(|| {
        Regex::new(r"(?i)(\d+)\s*seconds?").expect("seconds regex must compile")
    })
}
