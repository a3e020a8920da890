//! Operator notifications over the Telegram Bot API.
//!
//! Alerts go to a single configured chat via `sendMessage`.
//! Docs: <https://core.telegram.org/bots/api>


use async_trait::async_trait;
use chrono::{DateTime, Utc};
use herald_core::{config::NotifyConfig, message::Priority, traits::Notifier};
use std::time::Duration;
use tracing::{error, info, warn};

/// Telegram hard limit for a single message.
const MAX_MESSAGE_CHARS: usize = 4096;

/// Upper bound on one `sendMessage` round trip.
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Notifier posting to one Telegram chat.
pub struct TelegramNotifier {
    client: reqwest::Client,
    base_url: String,
    chat_id: String,
    /// Bot account named in the footer of every alert.
    identity: String,
    timeout: Duration,
}

impl TelegramNotifier {
    pub fn new(config: &NotifyConfig, identity: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: format!("https://api.telegram.org/bot{}", config.bot_token),
            chat_id: config.chat_id.clone(),
            identity: identity.to_string(),
            timeout: SEND_TIMEOUT,
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, subject: &str, body: &str, priority: Priority) -> bool {
        let text = format_notification(subject, body, priority, &self.identity, Utc::now());
        let url = format!("{}/sendMessage", self.base_url);
        let payload = serde_json::json!({
            "chat_id": self.chat_id,
            "text": text,
            "disable_web_page_preview": true,
        });

        let sent = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await;
        match sent {
            Ok(resp) if resp.status().is_success() => {
                info!("notification sent: {subject}");
                true
            }
            Ok(resp) => {
                let status = resp.status();
                let body = resp.text().await.unwrap_or_default();
                warn!("telegram notification got {status}: {body}");
                false
            }
            Err(e) => {
                error!("failed to send notification: {e}");
                false
            }
        }
    }
}

/// Render subject, body and footer into one message.
pub(crate) fn format_notification(
    subject: &str,
    body: &str,
    priority: Priority,
    identity: &str,
    now: DateTime<Utc>,
) -> String {
    let marker = match priority {
        Priority::High => "[HIGH] ",
        Priority::Normal => "",
    };
    let text = format!(
        "{marker}[Herald] {subject}\n\n{body}\n\n---\nBot: u/{identity}\nTime: {}",
        now.format("%Y-%m-%d %H:%M:%S UTC")
    );
    if text.chars().count() <= MAX_MESSAGE_CHARS {
        text
    } else {
        text.chars().take(MAX_MESSAGE_CHARS).collect()
    }
}
