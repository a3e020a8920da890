mod defaults;
mod templates;

#[cfg(test)]
mod tests;

pub use templates::{build_link, render_full_reply, LINK_PLACEHOLDER};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::HeraldError;
use defaults::*;
use templates::{default_full_reply, default_soft_prompt};

/// Upper bound for `outreach.soft_ask_expire_hours` (one year).
pub const MAX_EXPIRE_HOURS: i64 = 24 * 365;

/// Top-level Herald configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub herald: HeraldConfig,
    #[serde(default)]
    pub reddit: RedditConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
    #[serde(default)]
    pub outreach: OutreachConfig,
    #[serde(default)]
    pub intent: IntentConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeraldConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Optional log file. Empty = stdout only.
    #[serde(default)]
    pub log_file: String,
}

impl Default for HeraldConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_file: String::new(),
        }
    }
}

/// Reddit account and stream settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditConfig {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    /// The bot's own identity. Events by this author are never processed.
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Communities to watch. Each is its own quota channel.
    #[serde(default = "default_subreddits")]
    pub subreddits: Vec<String>,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    /// Ignore comments that already exist when the stream starts.
    #[serde(default = "default_true")]
    pub skip_existing: bool,
}

impl Default for RedditConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            username: String::new(),
            password: String::new(),
            user_agent: default_user_agent(),
            subreddits: default_subreddits(),
            poll_interval_secs: default_poll_interval(),
            skip_existing: true,
        }
    }
}

impl RedditConfig {
    /// Whether credentials are present.
    pub fn is_configured(&self) -> bool {
        !self.client_id.is_empty()
            && !self.client_secret.is_empty()
            && !self.username.is_empty()
            && !self.password.is_empty()
    }
}

/// Persistent store config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

/// Soft-ask policy: quotas, expiry, retry budget and message templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutreachConfig {
    /// Daily ceiling per channel.
    #[serde(default = "default_max_prompts_per_day")]
    pub max_prompts_per_day: u32,
    /// How long a soft-ask stays matchable.
    #[serde(default = "default_expire_hours")]
    pub soft_ask_expire_hours: i64,
    /// Minimum trimmed body length of a trigger candidate.
    #[serde(default = "default_min_body_len")]
    pub min_body_len: usize,
    /// Allow prompting an item again once its earlier offer expired unconfirmed.
    #[serde(default = "default_true")]
    pub reprompt_after_expiry: bool,
    /// Attempt budget per delivery.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Pause after every successful send.
    #[serde(default = "default_post_send_pause")]
    pub post_send_pause_secs: u64,
    /// How often expired offers are purged while running.
    #[serde(default = "default_purge_interval")]
    pub purge_interval_secs: u64,
    #[serde(default = "default_resource_url")]
    pub resource_url: String,
    #[serde(default = "default_utm_source")]
    pub utm_source: String,
    #[serde(default = "default_utm_medium")]
    pub utm_medium: String,
    #[serde(default = "default_utm_campaign")]
    pub utm_campaign: String,
    /// Soft-ask text. Never contains the link.
    #[serde(default = "default_soft_prompt")]
    pub soft_prompt: String,
    /// Full reply text; `{link}` is replaced by the tracked resource link.
    #[serde(default = "default_full_reply")]
    pub full_reply: String,
}

impl Default for OutreachConfig {
    fn default() -> Self {
        Self {
            max_prompts_per_day: default_max_prompts_per_day(),
            soft_ask_expire_hours: default_expire_hours(),
            min_body_len: default_min_body_len(),
            reprompt_after_expiry: true,
            max_attempts: default_max_attempts(),
            post_send_pause_secs: default_post_send_pause(),
            purge_interval_secs: default_purge_interval(),
            resource_url: default_resource_url(),
            utm_source: default_utm_source(),
            utm_medium: default_utm_medium(),
            utm_campaign: default_utm_campaign(),
            soft_prompt: default_soft_prompt(),
            full_reply: default_full_reply(),
        }
    }
}

impl OutreachConfig {
    /// Resource URL with tracking parameters.
    pub fn resource_link(&self) -> String {
        build_link(
            &self.resource_url,
            &self.utm_source,
            &self.utm_medium,
            &self.utm_campaign,
        )
    }

    /// The rendered full-resource reply.
    pub fn full_reply_text(&self) -> String {
        render_full_reply(&self.full_reply, &self.resource_link())
    }

    /// When a soft-ask posted at `now` stops being confirmable. `None` when
    /// the window does not fit in a timestamp.
    pub fn offer_expiry(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        chrono::Duration::try_hours(self.soft_ask_expire_hours)
            .and_then(|window| now.checked_add_signed(window))
    }
}

/// Word lists for the intent classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentConfig {
    #[serde(default = "default_trigger_keywords")]
    pub trigger_keywords: Vec<String>,
    #[serde(default = "default_affirmative_words")]
    pub affirmative_words: Vec<String>,
}

impl Default for IntentConfig {
    fn default() -> Self {
        Self {
            trigger_keywords: default_trigger_keywords(),
            affirmative_words: default_affirmative_words(),
        }
    }
}

/// Operator notifications (delivered through a Telegram bot).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub bot_token: String,
    /// Chat that receives the alerts.
    #[serde(default)]
    pub chat_id: String,
    #[serde(default = "default_true")]
    pub on_reply: bool,
    #[serde(default = "default_true")]
    pub on_error: bool,
    #[serde(default = "default_true")]
    pub on_moderation: bool,
    #[serde(default = "default_true")]
    pub daily_summary: bool,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            bot_token: String::new(),
            chat_id: String::new(),
            on_reply: true,
            on_error: true,
            on_moderation: true,
            daily_summary: true,
        }
    }
}

impl NotifyConfig {
    /// Enabled and fully configured.
    pub fn is_active(&self) -> bool {
        self.enabled && !self.bot_token.is_empty() && !self.chat_id.is_empty()
    }
}

impl Config {
    /// Override secrets from the environment when set.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    fn apply_env_from(&mut self, get: impl Fn(&str) -> Option<String>) {
        let pairs: [(&str, &mut String); 6] = [
            ("REDDIT_CLIENT_ID", &mut self.reddit.client_id),
            ("REDDIT_CLIENT_SECRET", &mut self.reddit.client_secret),
            ("REDDIT_USERNAME", &mut self.reddit.username),
            ("REDDIT_PASSWORD", &mut self.reddit.password),
            ("HERALD_TELEGRAM_TOKEN", &mut self.notify.bot_token),
            ("HERALD_TELEGRAM_CHAT_ID", &mut self.notify.chat_id),
        ];
        for (key, slot) in pairs {
            if let Some(value) = get(key).filter(|v| !v.is_empty()) {
                *slot = value;
            }
        }
    }

    /// Reject settings the state machine cannot run with.
    pub fn validate(&self) -> Result<(), HeraldError> {
        if self.outreach.max_prompts_per_day == 0 {
            return Err(HeraldError::Config(
                "outreach.max_prompts_per_day must be at least 1".into(),
            ));
        }
        if self.outreach.max_attempts == 0 {
            return Err(HeraldError::Config(
                "outreach.max_attempts must be at least 1".into(),
            ));
        }
        if self.outreach.soft_ask_expire_hours <= 0 {
            return Err(HeraldError::Config(
                "outreach.soft_ask_expire_hours must be positive".into(),
            ));
        }
        if self.outreach.soft_ask_expire_hours > MAX_EXPIRE_HOURS {
            return Err(HeraldError::Config(format!(
                "outreach.soft_ask_expire_hours must be at most {MAX_EXPIRE_HOURS}"
            )));
        }
        if self.reddit.subreddits.iter().all(|s| s.trim().is_empty()) {
            return Err(HeraldError::Config("reddit.subreddits is empty".into()));
        }
        if self.outreach.soft_prompt.contains(&self.outreach.resource_url) {
            return Err(HeraldError::Config(
                "outreach.soft_prompt must not contain the resource link".into(),
            ));
        }
        crate::intent::RegexClassifier::from_config(&self.intent)?;
        Ok(())
    }
}

/// Expand `~` to home directory.
pub fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return format!("{}/{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file does not exist.
pub fn load(path: &str) -> Result<Config, HeraldError> {
    let path = Path::new(path);
    if !path.exists() {
        info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| HeraldError::Config(format!("failed to read {}: {}", path.display(), e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| HeraldError::Config(format!("failed to parse config: {}", e)))?;

    Ok(config)
}
