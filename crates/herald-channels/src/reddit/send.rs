//! Reply posting and response classification.

use super::types::CommentResponse;
use super::RedditClient;
use async_trait::async_trait;
use herald_core::{
    error::DeliveryFailure,
    message::{DeliveredRef, InboundEvent, REPLY_PREFIX},
    traits::Transport,
};
use std::time::Duration;
use tracing::debug;

#[async_trait]
impl Transport for RedditClient {
    fn name(&self) -> &str {
        "reddit"
    }

    async fn deliver(
        &self,
        target: &InboundEvent,
        text: &str,
    ) -> Result<DeliveredRef, DeliveryFailure> {
        let token = self
            .access_token()
            .await
            .map_err(|e| DeliveryFailure::Unknown(e.to_string()))?;

        let thing_id = format!("{REPLY_PREFIX}{}", target.id);
        let resp = self
            .client
            .post(format!("{}/api/comment", self.api_base))
            .bearer_auth(token)
            .timeout(Duration::from_secs(30))
            .form(&[
                ("api_type", "json"),
                ("thing_id", thing_id.as_str()),
                ("text", text),
            ])
            .send()
            .await
            .map_err(|e| DeliveryFailure::Unknown(format!("reddit comment request failed: {e}")))?;

        let status = resp.status().as_u16();
        let reset_secs = resp
            .headers()
            .get(RATE_LIMIT_RESET_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_reset_secs);
        let body = resp
            .text()
            .await
            .map_err(|e| DeliveryFailure::Unknown(format!("reddit comment read failed: {e}")))?;

        if status == 401 {
            self.invalidate_token().await;
        }
        debug!("reddit comment on {thing_id} returned {status}");

        classify_comment_response(status, reset_secs, &body)
    }
}

/// Seconds until the rate-limit window resets, as sent by Reddit.
const RATE_LIMIT_RESET_HEADER: &str = "x-ratelimit-reset";

/// Header values may be fractional. Rounds up.
pub(crate) fn parse_reset_secs(value: &str) -> Option<u64> {
    let secs = value.trim().parse::<f64>().ok()?;
    if !secs.is_finite() || secs < 0.0 {
        return None;
    }
    Some(secs.ceil().min(u64::MAX as f64) as u64)
}

/// Map an `/api/comment` response onto a delivered ref or a classified failure.
///
/// `reset_secs` is the rate-limit reset hint, folded into a 429's detail so
/// the retry layer waits for it.
pub(crate) fn classify_comment_response(
    status: u16,
    reset_secs: Option<u64>,
    body: &str,
) -> Result<DeliveredRef, DeliveryFailure> {
    let snippet: String = body.chars().take(300).collect();
    match status {
        429 => {
            let detail = match reset_secs {
                Some(secs) => format!("HTTP 429: try again in {secs} seconds: {snippet}"),
                None => format!("HTTP 429: {snippet}"),
            };
            return Err(DeliveryFailure::RateLimited(detail));
        }
        401 => return Err(DeliveryFailure::ApiError(format!("UNAUTHORIZED: {snippet}"))),
        403 => return Err(DeliveryFailure::ApiError(format!("FORBIDDEN: {snippet}"))),
        500..=599 => {
            return Err(DeliveryFailure::ServerTransient(format!(
                "HTTP {status}: {snippet}"
            )))
        }
        200..=299 => {}
        _ => return Err(DeliveryFailure::ApiError(format!("HTTP {status}: {snippet}"))),
    }

    let parsed: CommentResponse = serde_json::from_str(body)
        .map_err(|e| DeliveryFailure::Unknown(format!("reddit comment parse failed: {e}")))?;

    if !parsed.json.errors.is_empty() {
        let is_rate_limit = parsed
            .json
            .errors
            .iter()
            .any(|err| err.first().and_then(|c| c.as_str()) == Some("RATELIMIT"));
        let detail = parsed
            .json
            .errors
            .iter()
            .map(|err| {
                err.iter()
                    .filter_map(|v| v.as_str())
                    .collect::<Vec<_>>()
                    .join(": ")
            })
            .collect::<Vec<_>>()
            .join("; ");
        return Err(if is_rate_limit {
            DeliveryFailure::RateLimited(detail)
        } else {
            DeliveryFailure::ApiError(detail)
        });
    }

    parsed
        .json
        .data
        .and_then(|d| d.things.into_iter().next())
        .map(|t| t.data.into_delivered())
        .ok_or_else(|| DeliveryFailure::Unknown("reddit comment response had no thing".into()))
}
