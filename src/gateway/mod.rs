//! Gateway: the main event loop connecting the event source, the ledgers
//! and the transport.
//!
//! Events are handled strictly one at a time: each is routed either to the
//! confirmation matcher (replies to a comment) or to the prompt issuer
//! (everything else), and fully resolved, retries included, before the next
//! one is pulled.

mod confirm;
mod delivery;
mod notices;
mod prompt;
mod routing;
mod summary;


pub use delivery::DeliveryExecutor;
pub use notices::Notices;
pub use summary::send_daily_summary;

use chrono::Utc;
use herald_core::{
    config::{NotifyConfig, OutreachConfig},
    error::{DeliveryFailure, SkipReason},
    message::InboundEvent,
    traits::{EventSource, IntentClassifier, Notifier, Pause, Transport},
};
use herald_memory::{
    audit::{DeliveryEntry, DeliveryKind, DeliveryStatus},
    day_key, DeliveryLogger, Store,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// How often housekeeping runs while the stream is idle.
const HOUSEKEEPING_TICK: Duration = Duration::from_secs(60);

/// Terminal result of handling one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A soft-ask was posted; `prompt_id` is the id of our reply.
    Prompted { prompt_id: String },
    /// The full resource was delivered for `orig_item_id`.
    Converted { orig_item_id: String },
    /// Deliberately left alone.
    Skipped(SkipReason),
    /// Delivery gave up. No bookkeeping was written.
    DeliveryFailed(DeliveryFailure),
}

/// The central context owning every collaborator handle.
pub struct Gateway {
    pub(super) source: Arc<dyn EventSource>,
    pub(super) classifier: Arc<dyn IntentClassifier>,
    pub(super) memory: Store,
    pub(super) audit: DeliveryLogger,
    pub(super) executor: DeliveryExecutor,
    pub(super) notices: Notices,
    pub(super) outreach: OutreachConfig,
    /// The bot's own account name.
    pub(super) identity: String,
}

impl Gateway {
    /// Create a new gateway.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        source: Arc<dyn EventSource>,
        transport: Arc<dyn Transport>,
        notifier: Arc<dyn Notifier>,
        classifier: Arc<dyn IntentClassifier>,
        pause: Arc<dyn Pause>,
        memory: Store,
        outreach: OutreachConfig,
        notify_config: NotifyConfig,
        identity: String,
    ) -> Self {
        let audit = DeliveryLogger::new(memory.pool().clone());
        let notices = Notices::new(notifier, notify_config);
        let executor = DeliveryExecutor::new(
            transport,
            pause,
            notices.clone(),
            outreach.max_attempts,
            Duration::from_secs(outreach.post_send_pause_secs),
        );
        Self {
            source,
            classifier,
            memory,
            audit,
            executor,
            notices,
            outreach,
            identity,
        }
    }

    /// Run the main event loop until the stream closes or Ctrl-C.
    pub async fn run(self) -> anyhow::Result<()> {
        info!(
            "Herald gateway running | source: {} | transport: {} | identity: u/{} | ceiling: {}/day",
            self.source.name(),
            self.executor.transport_name(),
            self.identity,
            self.outreach.max_prompts_per_day,
        );

        // Clean old offers on startup.
        let purged = self.memory.purge_expired_pending(Utc::now()).await?;
        if purged > 0 {
            info!("purged {purged} expired pending offers");
        }

        let mut rx = self
            .source
            .start()
            .await
            .map_err(|e| anyhow::anyhow!("failed to start source {}: {e}", self.source.name()))?;

        let mut current_day = day_key(Utc::now());
        let mut last_purge = Instant::now();
        let mut tick = tokio::time::interval(HOUSEKEEPING_TICK);

        loop {
            tokio::select! {
                maybe = rx.recv() => {
                    let Some(event) = maybe else {
                        warn!("event stream closed");
                        break;
                    };
                    self.process(event).await;
                    self.housekeeping(&mut current_day, &mut last_purge).await;
                }
                _ = tick.tick() => {
                    self.housekeeping(&mut current_day, &mut last_purge).await;
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal");
                    break;
                }
            }
        }

        if let Err(e) = self.source.stop().await {
            warn!("failed to stop source: {e}");
        }
        info!("Herald gateway stopped");
        Ok(())
    }

    /// Handle one event in isolation. Failures end here, never in the loop.
    async fn process(&self, event: InboundEvent) {
        let preview = if event.body.chars().count() > 60 {
            let truncated: String = event.body.chars().take(60).collect();
            format!("{truncated}...")
        } else {
            event.body.clone()
        };
        debug!("[r/{}] u/{} says: {}", event.channel, event.author, preview);

        match self.handle_event(&event).await {
            Ok(Outcome::Skipped(reason)) => {
                debug!("skipped {} ({reason})", event.id);
            }
            Ok(outcome) => {
                info!("event {} in r/{}: {outcome:?}", event.id, event.channel);
            }
            Err(e) => {
                error!("failed to process event {}: {e}", event.id);
                self.notices
                    .error(&e.to_string(), Some(&event.id), Some(&event.channel))
                    .await;
            }
        }
    }

    /// Periodic purge of expired offers and the daily summary on date rollover.
    async fn housekeeping(&self, current_day: &mut String, last_purge: &mut Instant) {
        let now = Utc::now();
        let today = day_key(now);
        if today != *current_day {
            let finished = std::mem::replace(current_day, today);
            if let Err(e) = send_daily_summary(&self.memory, &self.notices, &finished).await {
                warn!("daily summary for {finished} failed: {e}");
            }
        }

        let interval = Duration::from_secs(self.outreach.purge_interval_secs);
        if last_purge.elapsed() >= interval {
            *last_purge = Instant::now();
            match self.memory.purge_expired_pending(now).await {
                Ok(0) => {}
                Ok(n) => info!("purged {n} expired pending offers"),
                Err(e) => warn!("purge of expired offers failed: {e}"),
            }
        }
    }

    /// Append to the delivery log. A log write failure is not a delivery failure.
    pub(super) async fn log_delivery(
        &self,
        kind: DeliveryKind,
        event: &InboundEvent,
        delivered_id: Option<&str>,
        failure: Option<&DeliveryFailure>,
    ) {
        let entry = DeliveryEntry {
            kind,
            channel: event.channel.clone(),
            target_id: event.id.clone(),
            author: event.author.clone(),
            delivered_id: delivered_id.map(str::to_string),
            status: if failure.is_some() {
                DeliveryStatus::Error
            } else {
                DeliveryStatus::Ok
            },
            detail: failure.map(|f| f.to_string()),
        };
        if let Err(e) = self.audit.log(&entry).await {
            warn!("delivery log write failed: {e}");
        }
    }
}
