//! Reddit API adapter.
//!
//! Authenticates as a script app (password grant), polls the comment
//! listing of the configured subreddits, and posts replies via
//! `/api/comment`.
//! Docs: <https://www.reddit.com/dev/api>

mod auth;
mod send;
mod stream;
pub(crate) mod types;


use herald_core::{config::RedditConfig, error::HeraldError};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

const AUTH_URL: &str = "https://www.reddit.com/api/v1/access_token";
const API_BASE: &str = "https://oauth.reddit.com";

/// Reddit client used both as event source and as transport.
#[derive(Clone)]
pub struct RedditClient {
    config: RedditConfig,
    client: reqwest::Client,
    auth_url: String,
    api_base: String,
    token: Arc<Mutex<Option<AccessToken>>>,
}

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: Instant,
}

impl RedditClient {
    /// Create a new client from config.
    pub fn new(config: RedditConfig) -> Result<Self, HeraldError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| HeraldError::Channel(format!("failed to build http client: {e}")))?;
        Ok(Self {
            config,
            client,
            auth_url: AUTH_URL.to_string(),
            api_base: API_BASE.to_string(),
            token: Arc::new(Mutex::new(None)),
        })
    }

    /// The account the bot posts as.
    pub fn identity(&self) -> &str {
        &self.config.username
    }

    /// `a+b+c` path segment for a multi-subreddit listing.
    fn subreddit_path(&self) -> String {
        self.config
            .subreddits
            .iter()
            .map(|s| s.trim().trim_start_matches("r/"))
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("+")
    }
}
