use crate::{
    error::{DeliveryFailure, HeraldError},
    message::{DeliveredRef, InboundEvent, Priority},
};
use async_trait::async_trait;
use std::time::Duration;

/// Event source trait: where comments come from.
///
/// Implementations own connection, auth and pagination. Events that predate
/// `start()` are not yielded.
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Human-readable source name.
    fn name(&self) -> &str;

    /// Start listening. Returns a receiver yielding events one at a time.
    async fn start(&self) -> Result<tokio::sync::mpsc::Receiver<InboundEvent>, HeraldError>;

    /// Graceful shutdown.
    async fn stop(&self) -> Result<(), HeraldError> {
        Ok(())
    }
}

/// Outbound transport: posts a reply under an event.
///
/// One call is one attempt. Retrying is the caller's business.
#[async_trait]
pub trait Transport: Send + Sync {
    fn name(&self) -> &str;

    /// Reply to `target` with `text`.
    async fn deliver(&self, target: &InboundEvent, text: &str)
        -> Result<DeliveredRef, DeliveryFailure>;
}

/// Operator side-channel. Best-effort: never fails the caller.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Returns `true` if the notification was handed off.
    async fn notify(&self, subject: &str, body: &str, priority: Priority) -> bool;
}

/// Text classification used by the filter and the confirmation matcher.
pub trait IntentClassifier: Send + Sync {
    /// Does the text mention one of the trigger topics?
    fn matches_trigger(&self, text: &str) -> bool;

    /// Does the text express "yes, send it"?
    fn matches_affirmative(&self, text: &str) -> bool;
}

/// Suspension point used for every backoff and pacing wait.
#[async_trait]
pub trait Pause: Send + Sync {
    async fn pause(&self, duration: Duration);
}

/// Real timer.
pub struct TokioPause;

#[async_trait]
impl Pause for TokioPause {
    async fn pause(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Notifier used when notifications are turned off.
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify(&self, subject: &str, _body: &str, _priority: Priority) -> bool {
        tracing::debug!("notifications disabled, dropping: {subject}");
        false
    }
}
