use std::fmt;
use thiserror::Error;

/// Top-level error type for Herald.
#[derive(Debug, Error)]
pub enum HeraldError {
    /// Error from the inbound event stream.
    #[error("channel error: {0}")]
    Channel(String),

    /// A delivery that could not be completed.
    #[error("delivery error: {0}")]
    Delivery(#[from] DeliveryFailure),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Persistent store error.
    #[error("memory error: {0}")]
    Memory(String),
}

/// Classified failure of a single send, or of a whole delivery.
///
/// Transports return the first five variants for a single attempt.
/// `RetriesExhausted` is only produced by the retry layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryFailure {
    /// The provider asked us to slow down. Detail may carry the wait.
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// 5xx-style failure on the provider side.
    #[error("server error: {0}")]
    ServerTransient(String),

    /// The provider rejected the request.
    #[error("api error: {0}")]
    ApiError(String),

    /// The provider rejected the request in a way that looks like a ban or lockout.
    #[error("moderation suspected: {0}")]
    ModerationSuspected(String),

    /// Anything else (network, decode, ...).
    #[error("unexpected failure: {0}")]
    Unknown(String),

    /// Every attempt of the budget failed.
    #[error("failed after {attempts} attempts (last: {last})")]
    RetriesExhausted { attempts: u32, last: String },
}

/// Why an event was deliberately left alone. None of these are errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Authored by the bot itself.
    OwnEvent,
    /// Author deleted or unknown.
    MissingAuthor,
    /// The item already converted.
    DuplicateItem,
    /// Body does not look like a trigger.
    FilterMiss,
    /// A live soft-ask already tracks the item.
    AlreadyPending,
    /// The item was prompted before and re-prompting is disabled.
    AlreadyPrompted,
    /// Daily ceiling reached for the channel.
    QuotaExceeded,
    /// Reply to a reply that is not one of our prompts.
    NoPendingOffer,
    /// Reply to our prompt, but wrong author or no affirmative intent.
    PendingMismatch,
    /// Reply to our prompt after the offer expired.
    PendingExpired,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OwnEvent => "own_event",
            Self::MissingAuthor => "missing_author",
            Self::DuplicateItem => "duplicate_item",
            Self::FilterMiss => "filter_miss",
            Self::AlreadyPending => "already_pending",
            Self::AlreadyPrompted => "already_prompted",
            Self::QuotaExceeded => "quota_exceeded",
            Self::NoPendingOffer => "no_pending_offer",
            Self::PendingMismatch => "pending_mismatch",
            Self::PendingExpired => "pending_expired",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivery_failure_converts_into_herald_error() {
        let err: HeraldError = DeliveryFailure::RetriesExhausted {
            attempts: 3,
            last: "rate limited: HTTP 429".into(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "delivery error: failed after 3 attempts (last: rate limited: HTTP 429)"
        );
    }

    #[test]
    fn test_skip_reason_display() {
        assert_eq!(SkipReason::QuotaExceeded.to_string(), "quota_exceeded");
        assert_eq!(SkipReason::PendingExpired.to_string(), "pending_expired");
    }
}
