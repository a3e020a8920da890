//! Dedup ledger: original items that already converted.

use super::Store;
use chrono::{DateTime, Utc};
use herald_core::error::HeraldError;

impl Store {
    /// Whether the item already received the full resource.
    pub async fn has_replied(&self, item_id: &str) -> Result<bool, HeraldError> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM replied WHERE item_id = ?")
            .bind(item_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| HeraldError::Memory(format!("has_replied failed: {e}")))?;
        Ok(row.is_some())
    }

    /// Record a conversion. Insert-if-absent: the first timestamp wins.
    ///
    /// Returns `true` if a new record was written.
    pub async fn mark_replied(
        &self,
        item_id: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, HeraldError> {
        let result =
            sqlx::query("INSERT OR IGNORE INTO replied (item_id, created_at) VALUES (?, ?)")
                .bind(item_id)
                .bind(now.timestamp())
                .execute(&self.pool)
                .await
                .map_err(|e| HeraldError::Memory(format!("mark_replied failed: {e}")))?;
        Ok(result.rows_affected() > 0)
    }

    /// Total number of conversions.
    pub async fn replied_count(&self) -> Result<i64, HeraldError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM replied")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| HeraldError::Memory(format!("replied_count failed: {e}")))?;
        Ok(count)
    }
}
