//! Operator notices. Each kind honors its own toggle; none ever fails the caller.

use herald_core::{
    config::NotifyConfig,
    message::{InboundEvent, Priority},
    traits::Notifier,
};
use std::sync::Arc;

/// Formats and routes operator notices through the configured notifier.
#[derive(Clone)]
pub struct Notices {
    notifier: Arc<dyn Notifier>,
    config: NotifyConfig,
}

impl Notices {
    pub fn new(notifier: Arc<dyn Notifier>, config: NotifyConfig) -> Self {
        Self { notifier, config }
    }

    /// A soft-ask went out.
    pub async fn prompt_posted(&self, event: &InboundEvent) {
        if !self.config.on_reply {
            return;
        }
        let subject = format!("Bot replied in r/{}", event.channel);
        let body = format!(
            "The bot posted a soft-ask under a matching comment.\n\n\
             Comment ID: {}\n\
             Subreddit: r/{}\n\
             Comment URL: {}\n\n\
             The author has to reply with a yes before the link is sent.",
            event.id,
            event.channel,
            event.url()
        );
        self.notifier.notify(&subject, &body, Priority::Normal).await;
    }

    /// The full resource went out after a confirmation.
    pub async fn conversion(&self, event: &InboundEvent, orig_item_id: &str) {
        if !self.config.on_reply {
            return;
        }
        let subject = format!("Bot sent the resource link in r/{}", event.channel);
        let body = format!(
            "u/{} said yes and received the full reply.\n\n\
             Original comment ID: {}\n\
             Confirmation: {}\n\
             Subreddit: r/{}",
            event.author,
            orig_item_id,
            event.url(),
            event.channel
        );
        self.notifier.notify(&subject, &body, Priority::Normal).await;
    }

    pub async fn error(&self, message: &str, item_id: Option<&str>, channel: Option<&str>) {
        if !self.config.on_error {
            return;
        }
        let mut body = format!("The bot encountered an error:\n\nError: {message}\n");
        if let Some(id) = item_id {
            body.push_str(&format!("Comment ID: {id}\n"));
        }
        if let Some(ch) = channel {
            body.push_str(&format!("Subreddit: r/{ch}\n"));
        }
        self.notifier
            .notify("Bot Error Occurred", &body, Priority::High)
            .await;
    }

    /// The provider rejected a send in a way that looks like a ban or lockout.
    pub async fn moderation(&self, channel: &str, details: &str) {
        if !self.config.on_moderation {
            return;
        }
        let subject = format!("Moderation Alert: reply rejected in r/{channel}");
        let body = format!(
            "Potential moderation issue detected:\n\n\
             Subreddit: r/{channel}\n\
             Details: {details}\n\n\
             Check the subreddit before the bot keeps posting there."
        );
        self.notifier.notify(&subject, &body, Priority::High).await;
    }

    /// Returns `true` if the summary was handed to the notifier.
    pub async fn daily_summary(&self, subject: &str, body: &str) -> bool {
        if !self.config.daily_summary {
            return false;
        }
        self.notifier.notify(subject, body, Priority::Normal).await
    }
}
