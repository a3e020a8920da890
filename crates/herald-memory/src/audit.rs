//! Delivery log: records the terminal outcome of every delivery.

use herald_core::error::HeraldError;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

/// An entry to write to the delivery log.
pub struct DeliveryEntry {
    pub kind: DeliveryKind,
    pub channel: String,
    /// Event the bot replied to.
    pub target_id: String,
    pub author: String,
    /// Id of the posted reply (on success).
    pub delivered_id: Option<String>,
    pub status: DeliveryStatus,
    pub detail: Option<String>,
}

/// What was delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryKind {
    /// The soft-ask.
    Prompt,
    /// The full resource after confirmation.
    Conversion,
}

impl DeliveryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prompt => "prompt",
            Self::Conversion => "conversion",
        }
    }
}

/// Outcome of a logged delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    Ok,
    Error,
}

impl DeliveryStatus {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Error => "error",
        }
    }
}

/// Delivery logger backed by SQLite.
pub struct DeliveryLogger {
    pool: SqlitePool,
}

impl DeliveryLogger {
    /// Create a new logger sharing the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Write an entry to the delivery log.
    pub async fn log(&self, entry: &DeliveryEntry) -> Result<(), HeraldError> {
        let id = Uuid::new_v4().to_string();

        sqlx::query(
            "INSERT INTO delivery_log \
             (id, kind, channel, target_id, author, delivered_id, status, detail) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(entry.kind.as_str())
        .bind(&entry.channel)
        .bind(&entry.target_id)
        .bind(&entry.author)
        .bind(&entry.delivered_id)
        .bind(entry.status.as_str())
        .bind(&entry.detail)
        .execute(&self.pool)
        .await
        .map_err(|e| HeraldError::Memory(format!("delivery log write failed: {e}")))?;

        debug!(
            "delivery: {} {} -> {} [{}]",
            entry.kind.as_str(),
            entry.channel,
            entry.target_id,
            entry.status.as_str()
        );

        Ok(())
    }

    /// Count entries by kind and status.
    pub async fn count(
        &self,
        kind: DeliveryKind,
        status: DeliveryStatus,
    ) -> Result<i64, HeraldError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM delivery_log WHERE kind = ? AND status = ?")
                .bind(kind.as_str())
                .bind(status.as_str())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| HeraldError::Memory(format!("delivery log count failed: {e}")))?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Store;

    #[tokio::test]
    async fn test_log_and_count() {
        let store = Store::open_in_memory().await.unwrap();
        let audit = DeliveryLogger::new(store.pool().clone());

        audit
            .log(&DeliveryEntry {
                kind: DeliveryKind::Prompt,
                channel: "Calgary".into(),
                target_id: "c1".into(),
                author: "alice".into(),
                delivered_id: Some("p1".into()),
                status: DeliveryStatus::Ok,
                detail: None,
            })
            .await
            .unwrap();
        audit
            .log(&DeliveryEntry {
                kind: DeliveryKind::Conversion,
                channel: "Calgary".into(),
                target_id: "c2".into(),
                author: "alice".into(),
                delivered_id: None,
                status: DeliveryStatus::Error,
                detail: Some("failed after 5 attempts".into()),
            })
            .await
            .unwrap();

        assert_eq!(
            audit
                .count(DeliveryKind::Prompt, DeliveryStatus::Ok)
                .await
                .unwrap(),
            1
        );
        assert_eq!(
            audit
                .count(DeliveryKind::Conversion, DeliveryStatus::Error)
                .await
                .unwrap(),
            1
        );
        assert_eq!(
            audit
                .count(DeliveryKind::Conversion, DeliveryStatus::Ok)
                .await
                .unwrap(),
            0
        );
    }
}
