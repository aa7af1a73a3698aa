//! # Sync Engine
//!
//! Drains the outbox against the remote authority.
//!
//! ## Drain cycle
//!
//! 1. Read every unsynced action, oldest first.
//! 2. For each action, consult the retry policy. Exhausted actions are
//!    counted as failed without any network call. Actions still inside
//!    their backoff window are skipped.
//! 3. Call the remote authority. Success marks the action synced; failure
//!    bumps its retry counter and records the error text.
//! 4. Prune synced actions older than the retention window.
//! 5. Count what is still pending.
//!
//! Actions are processed one at a time so the remote authority sees them in
//! the order the front desk recorded them. A failing action never stops the
//! ones behind it, but a local store fault stops the whole drain. Only one
//! drain runs at a time; a second caller gets `SyncError::DrainInProgress`.
//!
//! ## Components
//!
//! - **Network Monitor**: connectivity source and online-edge callbacks
//! - **Scheduler**: turns startup, online edges, background ticks and manual
//!   requests into serialized drains
//! - **Sync State**: status snapshot for the UI
//! - **Metrics**: drain counters and timings

pub mod metrics;
pub mod network_monitor;
pub mod scheduler;
pub mod sync_state;

pub use metrics::SyncMetrics;
pub use network_monitor::{
    BackgroundSupport, ConnectivityPort, InMemoryConnectivity, NetworkMonitor, NetworkStatus,
    TriggerCallback,
};
pub use scheduler::{CoordinatorHandle, DrainOutcome, DrainReport, Trigger, TriggerCoordinator};
pub use sync_state::SyncState;

use crate::frontdesk::error::SyncError;
use crate::frontdesk::offline::{OutboxQueue, RetryDecision, RetryPolicy};
use crate::frontdesk::remote::RemoteAuthority;
use crate::shared::booking::PendingAction;
use crate::shared::clock::Clock;
use crate::shared::config::{AppConfig, DEFAULT_RETENTION};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};

/// Tallies from one drain
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DrainResult {
    /// Actions the remote authority accepted during this drain
    pub synced: u64,
    /// Actions that are, or just became, exhausted
    pub failed: u64,
    /// Unsynced actions with retries left, counted after the drain
    pub pending: u64,
}

pub struct SyncEngine {
    outbox: OutboxQueue,
    remote: Arc<dyn RemoteAuthority>,
    clock: Arc<dyn Clock>,
    policy: RetryPolicy,
    retention: Duration,
    drain_lock: Mutex<()>,
    metrics: RwLock<SyncMetrics>,
}

impl std::fmt::Debug for SyncEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncEngine")
            .field("policy", &self.policy)
            .field("retention", &self.retention)
            .finish_non_exhaustive()
    }
}

impl SyncEngine {
    pub fn new(outbox: OutboxQueue, remote: Arc<dyn RemoteAuthority>, clock: Arc<dyn Clock>) -> Self {
        let policy = RetryPolicy::new(outbox.max_retries());
        Self {
            outbox,
            remote,
            clock,
            policy,
            retention: DEFAULT_RETENTION,
            drain_lock: Mutex::new(()),
            metrics: RwLock::new(SyncMetrics::new()),
        }
    }

    /// Apply retry limit and retention from application config
    pub fn configured(self, config: &AppConfig) -> Self {
        let backoff = self.policy.backoff;
        self.with_policy(RetryPolicy::new(config.max_retries).with_backoff(backoff))
            .with_retention(config.retention)
    }

    /// The outbox uses the same retry limit as the policy
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.outbox = self.outbox.with_max_retries(policy.max_retries);
        self.policy = policy;
        self
    }

    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = retention;
        self
    }

    pub fn outbox(&self) -> &OutboxQueue {
        &self.outbox
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub fn is_draining(&self) -> bool {
        self.drain_lock.try_lock().is_err()
    }

    pub async fn metrics(&self) -> SyncMetrics {
        self.metrics.read().await.clone()
    }

    /// Run one drain cycle
    ///
    /// Returns `DrainInProgress` without touching the store when another
    /// drain holds the lock. A storage fault while reading the queue, or
    /// while recording an action's outcome, ends the drain with
    /// `StorageFault`. No remote call is made after an outcome could not be
    /// recorded.
    pub async fn drain(&self) -> Result<DrainResult, SyncError> {
        let _guard = match self.drain_lock.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                self.metrics.write().await.record_overlap();
                tracing::debug!("Drain requested while another drain is running");
                return Err(SyncError::DrainInProgress);
            }
        };

        self.metrics.write().await.record_drain_start();

        match self.drain_locked().await {
            Ok((result, pruned)) => {
                self.metrics.write().await.record_drain_success(&result, pruned);
                tracing::info!(
                    synced = result.synced,
                    failed = result.failed,
                    pending = result.pending,
                    pruned,
                    "Drain finished"
                );
                Ok(result)
            }
            Err(e) => {
                self.metrics.write().await.record_drain_failure();
                tracing::error!(error = %e, "Drain aborted by local store fault");
                Err(e)
            }
        }
    }

    async fn drain_locked(&self) -> Result<(DrainResult, u64), SyncError> {
        let actions = self.outbox.list_unsynced().await?;
        tracing::debug!(count = actions.len(), "Draining outbox");

        let mut result = DrainResult::default();

        for action in &actions {
            match self.policy.decide(action, self.clock.now_millis()) {
                RetryDecision::Exhausted => {
                    result.failed += 1;
                    continue;
                }
                RetryDecision::Wait => {
                    tracing::debug!(action_id = %action.id, "Action waiting out backoff");
                    continue;
                }
                RetryDecision::Attempt => {}
            }

            let recorded = match self.attempt(action).await {
                Ok(()) => self.outbox.mark_synced(&action.id).await.map(|_| {
                    result.synced += 1;
                }),
                Err(err) => {
                    tracing::warn!(error = %err, kind = %action.kind, "Action not accepted");
                    let message = match &err {
                        SyncError::TransientSyncFailure { source, .. } => source.to_string(),
                        other => other.to_string(),
                    };
                    self.outbox
                        .increment_retry(&action.id, Some(&message))
                        .await
                        .map(|count| {
                            if count == Some(self.policy.max_retries) {
                                tracing::warn!(action_id = %action.id, "Action exhausted its retries");
                                result.failed += 1;
                            }
                        })
                }
            };

            if let Err(e) = recorded {
                tracing::error!(action_id = %action.id, error = %e, "Could not record action outcome");
                return Err(e.into());
            }
        }

        let pruned = match self.outbox.prune_synced(self.retention).await {
            Ok(pruned) => pruned,
            Err(e) => {
                tracing::warn!(error = %e, "Pruning synced actions failed");
                0
            }
        };

        result.pending = self.outbox.count_pending().await?;
        Ok((result, pruned))
    }

    async fn attempt(&self, action: &PendingAction) -> Result<(), SyncError> {
        self.remote
            .apply(action.kind, &action.booking_id)
            .await
            .map_err(|e| SyncError::transient(&action.id, e))
    }
}
