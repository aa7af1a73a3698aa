//! Sync Error Types
//!
//! # Error Categories
//!
//! - `StorageFault` - the local store is unavailable or corrupt. Never
//!   retried; surfaced to the caller immediately.
//! - `TransientSyncFailure` - a remote call failed. Inside a drain this is
//!   absorbed into the action's retry counter and never escapes.
//! - `DrainInProgress` - another drain holds the drain lock.
//!
//! Exhausted retries are not an error: they show up as the `failed` tally of
//! a `DrainResult`.

use crate::frontdesk::local_db::StorageError;
use crate::frontdesk::remote::RemoteError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    /// Local store failure
    #[error("local store fault: {0}")]
    StorageFault(#[from] StorageError),

    /// Remote call for one action failed
    #[error("sync of action {action_id} failed: {source}")]
    TransientSyncFailure {
        action_id: String,
        #[source]
        source: RemoteError,
    },

    /// A drain is already running
    #[error("a drain is already in progress")]
    DrainInProgress,
}

impl SyncError {
    pub fn transient(action_id: impl Into<String>, source: RemoteError) -> Self {
        Self::TransientSyncFailure {
            action_id: action_id.into(),
            source,
        }
    }

    /// Whether the UI should present this as a device problem rather than a
    /// connectivity problem
    pub fn is_local_fault(&self) -> bool {
        matches!(self, SyncError::StorageFault(_))
    }
}
