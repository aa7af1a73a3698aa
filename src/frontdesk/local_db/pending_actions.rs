//! # Pending Action Collection
//!
//! Storage operations for the outbox. Replay order is creation time, with
//! insertion order breaking ties (`rowid`, which upserts preserve).
//!
//! The mutating helpers here are deliberately narrow: the synced flag only
//! ever goes from 0 to 1 and the retry counter only ever goes up.

use crate::frontdesk::local_db::bookings::set_booking_status;
use crate::frontdesk::local_db::{LocalDatabase, Result, StorageError};
use crate::shared::booking::PendingAction;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite};

const SELECT_ACTION: &str = "SELECT id, booking_id, kind, created_at, synced, retry_count,
        last_attempt_at, last_error
     FROM pending_actions";

impl LocalDatabase {
    /// Insert an action, or merge it into the stored one with the same id
    ///
    /// On conflict the identity fields (`booking_id`, `kind`, `created_at`)
    /// are kept, the synced flag and retry counter can only go up, and the
    /// last attempt details are replaced only when the new record has them.
    pub async fn put_action(&self, action: &PendingAction) -> Result<()> {
        upsert_action(&self.pool, action).await
    }

    pub async fn get_action(&self, action_id: &str) -> Result<Option<PendingAction>> {
        let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_ACTION))
            .bind(action_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(action_from_row).transpose()
    }

    /// Every action, synced or not, in replay order
    pub async fn all_actions(&self) -> Result<Vec<PendingAction>> {
        let rows = sqlx::query(&format!("{} ORDER BY created_at ASC, rowid ASC", SELECT_ACTION))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(action_from_row).collect()
    }

    /// Returns whether a row was removed
    pub async fn delete_action(&self, action_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM pending_actions WHERE id = ?")
            .bind(action_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Unsynced actions in FIFO replay order
    pub async fn unsynced_actions(&self) -> Result<Vec<PendingAction>> {
        let rows = sqlx::query(&format!(
            "{} WHERE synced = 0 ORDER BY created_at ASC, rowid ASC",
            SELECT_ACTION
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(action_from_row).collect()
    }

    /// Unsynced actions that have used up their automatic retries
    pub async fn exhausted_actions(&self, max_retries: u32) -> Result<Vec<PendingAction>> {
        let rows = sqlx::query(&format!(
            "{} WHERE synced = 0 AND retry_count >= ? ORDER BY created_at ASC, rowid ASC",
            SELECT_ACTION
        ))
        .bind(i64::from(max_retries))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(action_from_row).collect()
    }

    /// Write a new action and project its status onto the cached booking
    ///
    /// Both writes share one transaction. Returns whether a snapshot was
    /// patched.
    pub async fn insert_action_with_projection(&self, action: &PendingAction) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        upsert_action(&mut *tx, action).await?;
        let patched =
            set_booking_status(&mut *tx, &action.booking_id, action.kind.projected_status()).await?;

        tx.commit().await?;
        Ok(patched)
    }

    /// Set the synced flag; returns false when already synced or missing
    pub async fn mark_action_synced(&self, action_id: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE pending_actions SET synced = 1 WHERE id = ? AND synced = 0")
            .bind(action_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Bump the retry counter of an unsynced action
    ///
    /// Returns the new count, or `None` when the action is gone or synced.
    pub async fn increment_action_retry(
        &self,
        action_id: &str,
        attempted_at: i64,
        error: Option<&str>,
    ) -> Result<Option<u32>> {
        let row = sqlx::query(
            "UPDATE pending_actions SET
                retry_count = retry_count + 1,
                last_attempt_at = ?,
                last_error = ?
             WHERE id = ? AND synced = 0
             RETURNING retry_count",
        )
        .bind(attempted_at)
        .bind(error)
        .bind(action_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| retry_count_from(&row)).transpose()
    }

    /// Delete synced actions created strictly before `cutoff`
    pub async fn delete_synced_before(&self, cutoff: i64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM pending_actions WHERE synced = 1 AND created_at < ?")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Unsynced actions still eligible for automatic retry
    pub async fn count_retryable(&self, max_retries: u32) -> Result<u64> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM pending_actions WHERE synced = 0 AND retry_count < ?",
        )
        .bind(i64::from(max_retries))
        .fetch_one(&self.pool)
        .await?;
        Ok(count as u64)
    }
}

async fn upsert_action<'e, E>(executor: E, action: &PendingAction) -> Result<()>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO pending_actions (id, booking_id, kind, created_at, synced, retry_count,
            last_attempt_at, last_error)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(id) DO UPDATE SET
            synced = MAX(synced, excluded.synced),
            retry_count = MAX(retry_count, excluded.retry_count),
            last_attempt_at = COALESCE(excluded.last_attempt_at, last_attempt_at),
            last_error = COALESCE(excluded.last_error, last_error)",
    )
    .bind(&action.id)
    .bind(&action.booking_id)
    .bind(action.kind.as_str())
    .bind(action.created_at)
    .bind(action.synced)
    .bind(i64::from(action.retry_count))
    .bind(action.last_attempt_at)
    .bind(action.last_error.as_deref())
    .execute(executor)
    .await?;
    Ok(())
}

fn retry_count_from(row: &SqliteRow) -> Result<u32> {
    let raw: i64 = row.try_get("retry_count")?;
    u32::try_from(raw).map_err(|e| StorageError::corrupt("retry_count", e))
}

fn action_from_row(row: &SqliteRow) -> Result<PendingAction> {
    let kind: String = row.try_get("kind")?;

    Ok(PendingAction {
        id: row.try_get("id")?,
        booking_id: row.try_get("booking_id")?,
        kind: kind.parse().map_err(|e| StorageError::corrupt("kind", e))?,
        created_at: row.try_get("created_at")?,
        synced: row.try_get("synced")?,
        retry_count: retry_count_from(row)?,
        last_attempt_at: row.try_get("last_attempt_at")?,
        last_error: row.try_get("last_error")?,
    })
}
