//! Comment polling loop and EventSource implementation.

use super::types::Listing;
use super::RedditClient;
use async_trait::async_trait;
use herald_core::{error::HeraldError, message::InboundEvent, traits::EventSource};
use std::collections::{HashSet, VecDeque};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

/// How many recent comment ids are remembered to drop repeats between polls.
const SEEN_WINDOW: usize = 2000;

#[async_trait]
impl EventSource for RedditClient {
    fn name(&self) -> &str {
        "reddit"
    }

    async fn start(&self) -> Result<mpsc::Receiver<InboundEvent>, HeraldError> {
        // Fail fast on bad credentials.
        self.access_token().await?;

        let (tx, rx) = mpsc::channel(64);
        let this = self.clone();
        let poll_interval = Duration::from_secs(self.config.poll_interval_secs.max(1));

        info!(
            "Reddit stream starting on r/{} (skip_existing: {})",
            self.subreddit_path(),
            self.config.skip_existing
        );

        tokio::spawn(async move {
            let mut seen = SeenWindow::new(SEEN_WINDOW);
            // With skip_existing, the first successful poll only fills the window.
            let mut seeded = !this.config.skip_existing;
            let mut backoff_secs: u64 = 1;

            loop {
                let events = match this.fetch_new_comments().await {
                    Ok(events) => events,
                    Err(e) => {
                        error!("reddit poll error (retry in {backoff_secs}s): {e}");
                        tokio::time::sleep(Duration::from_secs(backoff_secs)).await;
                        backoff_secs = (backoff_secs * 2).min(60);
                        continue;
                    }
                };

                // Successful poll -- reset backoff.
                backoff_secs = 1;

                // Listing is newest-first; emit oldest-first.
                for event in events.into_iter().rev() {
                    if !seen.insert(&event.id) {
                        continue;
                    }
                    if !seeded {
                        continue;
                    }
                    if tx.send(event).await.is_err() {
                        info!("reddit stream receiver dropped, stopping poll");
                        return;
                    }
                }
                if !seeded {
                    debug!("reddit stream seeded with {} existing comments", seen.len());
                    seeded = true;
                }

                tokio::time::sleep(poll_interval).await;
            }
        });

        Ok(rx)
    }

    async fn stop(&self) -> Result<(), HeraldError> {
        info!("Reddit stream stopped");
        Ok(())
    }
}

impl RedditClient {
    /// Fetch the newest comments across the configured subreddits.
    pub(crate) async fn fetch_new_comments(&self) -> Result<Vec<InboundEvent>, HeraldError> {
        let token = self.access_token().await?;
        let url = format!(
            "{}/r/{}/comments?limit=100&raw_json=1",
            self.api_base,
            self.subreddit_path()
        );

        let resp = self
            .client
            .get(&url)
            .bearer_auth(token)
            .timeout(Duration::from_secs(30))
            .send()
            .await
            .map_err(|e| HeraldError::Channel(format!("reddit listing request failed: {e}")))?;

        let status = resp.status();
        if status.as_u16() == 401 {
            self.invalidate_token().await;
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(HeraldError::Channel(format!(
                "reddit listing returned {status}: {body}"
            )));
        }

        let listing: Listing = resp
            .json()
            .await
            .map_err(|e| HeraldError::Channel(format!("reddit listing parse failed: {e}")))?;

        Ok(listing_events(listing))
    }
}

/// Comments from a listing, in listing order.
pub(crate) fn listing_events(listing: Listing) -> Vec<InboundEvent> {
    listing
        .data
        .children
        .into_iter()
        .filter(|t| t.kind == "t1")
        .map(|t| t.data.into_event())
        .collect()
}

/// Bounded set of recently seen ids; oldest ids fall out first.
pub(crate) struct SeenWindow {
    order: VecDeque<String>,
    ids: HashSet<String>,
    capacity: usize,
}

impl SeenWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            order: VecDeque::with_capacity(capacity),
            ids: HashSet::with_capacity(capacity),
            capacity,
        }
    }

    /// Returns `true` if the id was not seen before.
    pub fn insert(&mut self, id: &str) -> bool {
        if self.ids.contains(id) {
            return false;
        }
        if self.order.len() == self.capacity {
            if let Some(old) = self.order.pop_front() {
                self.ids.remove(&old);
            }
        }
        self.order.push_back(id.to_string());
        self.ids.insert(id.to_string());
        true
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }
}
