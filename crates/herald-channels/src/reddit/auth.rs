//! OAuth password-grant token handling.

use super::types::TokenResponse;
use super::{AccessToken, RedditClient};
use herald_core::error::HeraldError;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Refresh this long before the provider-reported expiry.
const REFRESH_MARGIN: Duration = Duration::from_secs(60);

impl RedditClient {
    /// Current bearer token, fetching a new one when missing or about to expire.
    pub(crate) async fn access_token(&self) -> Result<String, HeraldError> {
        let mut guard = self.token.lock().await;
        if let Some(ref tok) = *guard {
            if tok.expires_at > Instant::now() + REFRESH_MARGIN {
                return Ok(tok.value.clone());
            }
            debug!("reddit token about to expire, refreshing");
        }

        let resp = self
            .client
            .post(&self.auth_url)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[
                ("grant_type", "password"),
                ("username", self.config.username.as_str()),
                ("password", self.config.password.as_str()),
            ])
            .send()
            .await
            .map_err(|e| HeraldError::Channel(format!("reddit auth request failed: {e}")))?;

        let status = resp.status();
        let body: TokenResponse = resp
            .json()
            .await
            .map_err(|e| HeraldError::Channel(format!("reddit auth parse failed ({status}): {e}")))?;

        if let Some(err) = body.error {
            return Err(HeraldError::Channel(format!("reddit auth rejected: {err}")));
        }
        let value = body
            .access_token
            .ok_or_else(|| HeraldError::Channel("reddit auth returned no token".into()))?;
        let ttl = Duration::from_secs(body.expires_in.unwrap_or(3600));

        info!("reddit token acquired for u/{}", self.config.username);
        *guard = Some(AccessToken {
            value: value.clone(),
            expires_at: Instant::now() + ttl,
        });
        Ok(value)
    }

    /// Drop the cached token so the next call re-authenticates.
    pub(crate) async fn invalidate_token(&self) {
        *self.token.lock().await = None;
    }
}
