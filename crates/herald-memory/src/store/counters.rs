//! Quota tracker: per-(day, channel) counters.

use super::Store;
use chrono::{DateTime, Utc};
use herald_core::error::HeraldError;

/// UTC date key (`YYYY-MM-DD`) used by the counters.
pub fn day_key(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%d").to_string()
}

impl Store {
    /// Count for `channel` on `date`. Missing rows count as zero.
    pub async fn day_count(&self, date: &str, channel: &str) -> Result<u32, HeraldError> {
        let row: Option<(i64,)> =
            sqlx::query_as("SELECT count FROM daily_counter WHERE date = ? AND channel = ?")
                .bind(date)
                .bind(channel)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| HeraldError::Memory(format!("day_count failed: {e}")))?;
        Ok(row.map(|(c,)| c.max(0) as u32).unwrap_or(0))
    }

    /// Increment the counter and return the new value.
    pub async fn increment_day_count(
        &self,
        date: &str,
        channel: &str,
    ) -> Result<u32, HeraldError> {
        let (count,): (i64,) = sqlx::query_as(
            "INSERT INTO daily_counter (date, channel, count) VALUES (?, ?, 1) \
             ON CONFLICT(date, channel) DO UPDATE SET count = count + 1 \
             RETURNING count",
        )
        .bind(date)
        .bind(channel)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| HeraldError::Memory(format!("increment_day_count failed: {e}")))?;
        Ok(count.max(0) as u32)
    }

    /// All channel counts for `date`, ordered by channel name.
    pub async fn day_counts(&self, date: &str) -> Result<Vec<(String, u32)>, HeraldError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT channel, count FROM daily_counter WHERE date = ? ORDER BY channel",
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| HeraldError::Memory(format!("day_counts failed: {e}")))?;
        Ok(rows
            .into_iter()
            .map(|(ch, c)| (ch, c.max(0) as u32))
            .collect())
    }
}
