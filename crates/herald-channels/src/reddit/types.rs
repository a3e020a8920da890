//! Reddit API deserialization types.

use chrono::{TimeZone, Utc};
use herald_core::message::{DeliveredRef, InboundEvent};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: Option<String>,
    pub expires_in: Option<u64>,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Listing {
    pub data: ListingData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListingData {
    #[serde(default)]
    pub children: Vec<Thing>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Thing {
    pub kind: String,
    pub data: CommentData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommentData {
    pub id: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub subreddit: String,
    #[serde(default)]
    pub permalink: String,
    #[serde(default)]
    pub created_utc: f64,
}

impl CommentData {
    pub fn into_event(self) -> InboundEvent {
        let timestamp = Utc
            .timestamp_opt(self.created_utc as i64, 0)
            .single()
            .unwrap_or_else(Utc::now);
        InboundEvent {
            id: self.id,
            author: self.author,
            body: self.body,
            parent_id: self.parent_id,
            channel: self.subreddit,
            permalink: self.permalink,
            timestamp,
        }
    }

    pub fn into_delivered(self) -> DeliveredRef {
        DeliveredRef {
            id: self.id,
            permalink: self.permalink,
        }
    }
}

/// Response of `POST /api/comment` with `api_type=json`.
#[derive(Debug, Deserialize)]
pub(crate) struct CommentResponse {
    pub json: CommentJson,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommentJson {
    /// Each error is `[code, message, field]`.
    #[serde(default)]
    pub errors: Vec<Vec<serde_json::Value>>,
    #[serde(default)]
    pub data: Option<CommentJsonData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommentJsonData {
    #[serde(default)]
    pub things: Vec<Thing>,
}
