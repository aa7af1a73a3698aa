//! # Outbox Queue
//!
//! Durable queue of check-in/check-out intents waiting for the remote
//! authority. Every write goes through this type or the sync engine; UI code
//! never touches outbox rows directly.
//!
//! ## Features
//!
//! - **Optimistic projection**: enqueueing patches the cached booking's status
//!   in the same transaction, so the UI reflects the action immediately
//! - **FIFO replay**: unsynced entries come back in creation order
//! - **Idempotent bookkeeping**: marking synced twice, or bumping the retry
//!   counter of a pruned entry, is a no-op
//! - **Dead entries**: exhausted actions stay visible for manual resubmission
//!
//! ## Usage
//!
//! ```rust,no_run
//! use frontdesk_sync::frontdesk::local_db::LocalDatabase;
//! use frontdesk_sync::frontdesk::offline::OutboxQueue;
//! use frontdesk_sync::shared::{ActionKind, SystemClock};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), frontdesk_sync::frontdesk::local_db::StorageError> {
//! let db = LocalDatabase::open_in_memory().await?;
//! let queue = OutboxQueue::new(db, Arc::new(SystemClock));
//!
//! let action = queue.enqueue("B1", ActionKind::CheckIn).await?;
//! assert!(!action.synced);
//! # Ok(())
//! # }
//! ```

use crate::frontdesk::local_db::{LocalDatabase, Result};
use crate::shared::booking::{ActionKind, PendingAction};
use crate::shared::clock::Clock;
use crate::shared::config::DEFAULT_MAX_RETRIES;
use std::sync::Arc;
use std::time::Duration;

/// Outbox of pending front-desk actions
#[derive(Debug, Clone)]
pub struct OutboxQueue {
    db: LocalDatabase,
    clock: Arc<dyn Clock>,
    max_retries: u32,
}

impl OutboxQueue {
    pub fn new(db: LocalDatabase, clock: Arc<dyn Clock>) -> Self {
        Self {
            db,
            clock,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Override the retry cap used to classify dead entries
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Record a new action and project it onto the cached booking
    ///
    /// Succeeds even when no snapshot is cached for `booking_id`; the
    /// projection is simply skipped.
    pub async fn enqueue(&self, booking_id: &str, kind: ActionKind) -> Result<PendingAction> {
        let action = PendingAction::new(booking_id, kind, self.clock.now_millis());
        let patched = self.db.insert_action_with_projection(&action).await?;

        tracing::debug!(
            action_id = %action.id,
            booking_id,
            kind = %kind,
            patched,
            "Enqueued front-desk action"
        );
        Ok(action)
    }

    /// Unsynced actions, oldest first
    pub async fn list_unsynced(&self) -> Result<Vec<PendingAction>> {
        self.db.unsynced_actions().await
    }

    pub async fn get(&self, action_id: &str) -> Result<Option<PendingAction>> {
        self.db.get_action(action_id).await
    }

    /// Returns false when the action was already synced or no longer exists
    pub async fn mark_synced(&self, action_id: &str) -> Result<bool> {
        self.db.mark_action_synced(action_id).await
    }

    /// Record a failed attempt
    ///
    /// Returns the new retry count, or `None` if the action was pruned.
    pub async fn increment_retry(&self, action_id: &str, error: Option<&str>) -> Result<Option<u32>> {
        self.db
            .increment_action_retry(action_id, self.clock.now_millis(), error)
            .await
    }

    /// Actions out of automatic retries, for the "sync failed" indicator
    pub async fn list_dead(&self) -> Result<Vec<PendingAction>> {
        self.db.exhausted_actions(self.max_retries).await
    }

    /// Count of unsynced actions still eligible for retry
    pub async fn count_pending(&self) -> Result<u64> {
        self.db.count_retryable(self.max_retries).await
    }

    /// Drop an unsynced action; synced history is left alone
    pub async fn cancel(&self, action_id: &str) -> Result<bool> {
        match self.db.get_action(action_id).await? {
            Some(action) if !action.synced => {
                let removed = self.db.delete_action(action_id).await?;
                tracing::info!(action_id, booking_id = %action.booking_id, "Cancelled pending action");
                Ok(removed)
            }
            _ => Ok(false),
        }
    }

    /// Replace a dead action with a fresh one for the same booking and kind
    ///
    /// The replacement is written before the dead entry is removed, so a
    /// crash in between leaves a duplicate rather than losing the intent.
    pub async fn resubmit(&self, action_id: &str) -> Result<Option<PendingAction>> {
        let dead = match self.db.get_action(action_id).await? {
            Some(action) if action.is_dead(self.max_retries) => action,
            _ => return Ok(None),
        };

        let replacement = self.enqueue(&dead.booking_id, dead.kind).await?;
        self.db.delete_action(&dead.id).await?;

        tracing::info!(
            old_action_id = %dead.id,
            new_action_id = %replacement.id,
            "Resubmitted exhausted action"
        );
        Ok(Some(replacement))
    }

    /// Delete synced actions older than `retention`
    pub async fn prune_synced(&self, retention: Duration) -> Result<u64> {
        let cutoff = self.clock.now_millis() - retention.as_millis() as i64;
        self.db.delete_synced_before(cutoff).await
    }
}
