//! # Sync State
//!
//! Snapshot of what the trigger coordinator is doing, for status badges.

use crate::frontdesk::sync::network_monitor::NetworkStatus;
use crate::frontdesk::sync::DrainResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncState {
    pub is_syncing: bool,
    /// Completion time of the last drain that returned a result
    pub last_sync: Option<i64>,
    pub last_result: Option<DrainResult>,
    /// Storage fault from the most recent drain, cleared by the next success
    pub last_error: Option<String>,
    pub network_status: NetworkStatus,
}

impl Default for SyncState {
    fn default() -> Self {
        Self {
            is_syncing: false,
            last_sync: None,
            last_result: None,
            last_error: None,
            network_status: NetworkStatus::Unknown,
        }
    }
}

impl SyncState {
    /// Whether the UI should show the "sync failed" indicator
    pub fn needs_attention(&self) -> bool {
        self.last_error.is_some() || self.last_result.is_some_and(|r| r.failed > 0)
    }
}
