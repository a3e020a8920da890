//! Pending offer ledger: soft-asks waiting for the author to say yes.

use super::Store;
use chrono::{DateTime, TimeZone, Utc};
use herald_core::error::HeraldError;

/// An outstanding soft-ask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingOffer {
    /// The item that triggered the soft-ask.
    pub orig_item_id: String,
    pub orig_author: String,
    /// Id of the soft-ask reply itself.
    pub prompt_id: String,
    pub expires_at: DateTime<Utc>,
}

impl PendingOffer {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}

type PendingRow = (String, String, String, i64);

fn from_row((orig_item_id, orig_author, prompt_id, expires_at): PendingRow) -> PendingOffer {
    PendingOffer {
        orig_item_id,
        orig_author,
        prompt_id,
        expires_at: Utc
            .timestamp_opt(expires_at, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::MIN_UTC),
    }
}

impl Store {
    /// Insert or replace the offer.
    ///
    /// Replacement happens on either key, so an `orig_item_id` never has two
    /// offers and a `prompt_id` never points at two items.
    pub async fn upsert_pending(&self, offer: &PendingOffer) -> Result<(), HeraldError> {
        sqlx::query(
            "INSERT OR REPLACE INTO pending (orig_item_id, orig_author, prompt_id, expires_at) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(&offer.orig_item_id)
        .bind(&offer.orig_author)
        .bind(&offer.prompt_id)
        .bind(offer.expires_at.timestamp())
        .execute(&self.pool)
        .await
        .map_err(|e| HeraldError::Memory(format!("upsert_pending failed: {e}")))?;
        Ok(())
    }

    /// Look up the offer whose soft-ask has id `prompt_id`.
    pub async fn pending_by_prompt(
        &self,
        prompt_id: &str,
    ) -> Result<Option<PendingOffer>, HeraldError> {
        let row: Option<PendingRow> = sqlx::query_as(
            "SELECT orig_item_id, orig_author, prompt_id, expires_at FROM pending WHERE prompt_id = ?",
        )
        .bind(prompt_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| HeraldError::Memory(format!("pending_by_prompt failed: {e}")))?;
        Ok(row.map(from_row))
    }

    /// Look up the offer tracking the original item.
    pub async fn pending_by_orig(
        &self,
        orig_item_id: &str,
    ) -> Result<Option<PendingOffer>, HeraldError> {
        let row: Option<PendingRow> = sqlx::query_as(
            "SELECT orig_item_id, orig_author, prompt_id, expires_at FROM pending WHERE orig_item_id = ?",
        )
        .bind(orig_item_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| HeraldError::Memory(format!("pending_by_orig failed: {e}")))?;
        Ok(row.map(from_row))
    }

    /// Delete by prompt id. Returns `true` if a row was removed.
    pub async fn delete_pending_by_prompt(&self, prompt_id: &str) -> Result<bool, HeraldError> {
        let result = sqlx::query("DELETE FROM pending WHERE prompt_id = ?")
            .bind(prompt_id)
            .execute(&self.pool)
            .await
            .map_err(|e| HeraldError::Memory(format!("delete_pending_by_prompt failed: {e}")))?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete by original item id. Returns `true` if a row was removed.
    pub async fn delete_pending_by_orig(&self, orig_item_id: &str) -> Result<bool, HeraldError> {
        let result = sqlx::query("DELETE FROM pending WHERE orig_item_id = ?")
            .bind(orig_item_id)
            .execute(&self.pool)
            .await
            .map_err(|e| HeraldError::Memory(format!("delete_pending_by_orig failed: {e}")))?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove every offer with `expires_at < now`. Returns the number removed.
    pub async fn purge_expired_pending(&self, now: DateTime<Utc>) -> Result<u64, HeraldError> {
        let result = sqlx::query("DELETE FROM pending WHERE expires_at < ?")
            .bind(now.timestamp())
            .execute(&self.pool)
            .await
            .map_err(|e| HeraldError::Memory(format!("purge_expired_pending failed: {e}")))?;
        Ok(result.rows_affected())
    }

    /// Number of offers currently stored (live or not yet purged).
    pub async fn pending_count(&self) -> Result<i64, HeraldError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM pending")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| HeraldError::Memory(format!("pending_count failed: {e}")))?;
        Ok(count)
    }
}
