//! Items that ever received a soft-ask.

use super::Store;
use chrono::{DateTime, Utc};
use herald_core::error::HeraldError;

impl Store {
    pub async fn was_prompted(&self, item_id: &str) -> Result<bool, HeraldError> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM prompted WHERE item_id = ?")
            .bind(item_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| HeraldError::Memory(format!("was_prompted failed: {e}")))?;
        Ok(row.is_some())
    }

    pub async fn mark_prompted(&self, item_id: &str, now: DateTime<Utc>) -> Result<(), HeraldError> {
        sqlx::query("INSERT OR IGNORE INTO prompted (item_id, prompted_at) VALUES (?, ?)")
            .bind(item_id)
            .bind(now.timestamp())
            .execute(&self.pool)
            .await
            .map_err(|e| HeraldError::Memory(format!("mark_prompted failed: {e}")))?;
        Ok(())
    }
}
