//! # Sync Scheduler
//!
//! Decides when the outbox drains. Four things start a drain:
//!
//! - **Startup**: the coordinator is attached while the device is online
//! - **Online edge**: connectivity goes from offline to online
//! - **Background tick**: the platform's periodic background slot, if any
//! - **Manual**: the host calls `CoordinatorHandle::request_drain`
//!
//! Triggers land on one channel read by one task, so drains never overlap.
//! Triggers that pile up while a drain runs are folded into the next drain.
//! Shutting down lets a drain in flight finish before the task exits.

use crate::frontdesk::error::SyncError;
use crate::frontdesk::sync::network_monitor::{
    BackgroundSupport, ConnectivityPort, NetworkStatus, TriggerCallback,
};
use crate::frontdesk::sync::sync_state::SyncState;
use crate::frontdesk::sync::{DrainResult, SyncEngine, SyncMetrics};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, watch, RwLock};
use tokio::task::JoinHandle;

/// Capacity of the drain report channel
const REPORT_CAPACITY: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Startup,
    Online,
    Background,
    Manual,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrainOutcome {
    Completed(DrainResult),
    /// The local store failed; the message is the storage error
    Faulted(String),
}

/// Published after every drain the coordinator runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrainReport {
    /// Trigger that started the drain; later triggers folded into it are not listed
    pub trigger: Trigger,
    pub outcome: DrainOutcome,
}

pub struct TriggerCoordinator;

impl TriggerCoordinator {
    /// Wire `engine` to `port` and start the drain task
    ///
    /// Must be called from within a Tokio runtime.
    pub fn attach(engine: Arc<SyncEngine>, port: Arc<dyn ConnectivityPort>) -> CoordinatorHandle {
        let (trigger_tx, trigger_rx) = mpsc::unbounded_channel();
        let (report_tx, _) = broadcast::channel(REPORT_CAPACITY);
        let (stop_tx, stop_rx) = watch::channel(false);
        let state = Arc::new(RwLock::new(SyncState::default()));

        port.on_transition_to_online(Self::sender(&trigger_tx, Trigger::Online));
        let background = port.register_background_trigger(Self::sender(&trigger_tx, Trigger::Background));
        match background {
            BackgroundSupport::Registered => tracing::debug!("Background sync registered"),
            BackgroundSupport::Unavailable => {
                tracing::info!("Background sync unavailable; relying on foreground triggers")
            }
        }

        if port.is_online() {
            let _ = trigger_tx.send(Trigger::Startup);
        }

        let task = tokio::spawn(Self::run(
            Arc::clone(&engine),
            trigger_rx,
            stop_rx,
            report_tx.clone(),
            Arc::clone(&state),
        ));

        CoordinatorHandle {
            engine,
            port,
            trigger_tx,
            stop_tx,
            report_tx,
            state,
            background,
            task: Some(task),
        }
    }

    fn sender(tx: &mpsc::UnboundedSender<Trigger>, trigger: Trigger) -> TriggerCallback {
        let tx = tx.clone();
        Arc::new(move || {
            let _ = tx.send(trigger);
        })
    }

    async fn run(
        engine: Arc<SyncEngine>,
        mut triggers: mpsc::UnboundedReceiver<Trigger>,
        mut stop: watch::Receiver<bool>,
        reports: broadcast::Sender<DrainReport>,
        state: Arc<RwLock<SyncState>>,
    ) {
        loop {
            // Only the wait for a trigger is cancellable; a started drain always finishes
            let trigger = tokio::select! {
                biased;
                _ = stop.changed() => break,
                trigger = triggers.recv() => match trigger {
                    Some(trigger) => trigger,
                    None => break,
                },
            };

            let mut folded = 0usize;
            while triggers.try_recv().is_ok() {
                folded += 1;
            }
            tracing::debug!(?trigger, folded, "Starting drain");

            state.write().await.is_syncing = true;
            let outcome = engine.drain().await;

            let mut current = state.write().await;
            current.is_syncing = false;
            let outcome = match outcome {
                Ok(result) => {
                    current.last_sync = Some(engine.clock().now_millis());
                    current.last_result = Some(result);
                    current.last_error = None;
                    DrainOutcome::Completed(result)
                }
                Err(SyncError::DrainInProgress) => {
                    // Someone called the engine directly; their drain covers this trigger
                    continue;
                }
                Err(e) => {
                    current.last_error = Some(e.to_string());
                    DrainOutcome::Faulted(e.to_string())
                }
            };
            drop(current);

            // No subscribers is fine
            let _ = reports.send(DrainReport { trigger, outcome });
        }
        tracing::debug!("Trigger coordinator stopped");
    }
}

/// Handle to a running coordinator
///
/// Dropping it stops the drain task once any drain in flight has finished.
/// Call `shutdown` to wait for that.
pub struct CoordinatorHandle {
    engine: Arc<SyncEngine>,
    port: Arc<dyn ConnectivityPort>,
    trigger_tx: mpsc::UnboundedSender<Trigger>,
    stop_tx: watch::Sender<bool>,
    report_tx: broadcast::Sender<DrainReport>,
    state: Arc<RwLock<SyncState>>,
    background: BackgroundSupport,
    task: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for CoordinatorHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoordinatorHandle")
            .field("background", &self.background)
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}

impl CoordinatorHandle {
    /// Queue a manual drain; false once the coordinator has shut down
    pub fn request_drain(&self) -> bool {
        self.is_running() && self.trigger_tx.send(Trigger::Manual).is_ok()
    }

    /// Reports for drains that finish after this call
    pub fn subscribe(&self) -> broadcast::Receiver<DrainReport> {
        self.report_tx.subscribe()
    }

    pub async fn status(&self) -> SyncState {
        let mut state = self.state.read().await.clone();
        state.network_status = if self.port.is_online() {
            NetworkStatus::Online
        } else {
            NetworkStatus::Offline
        };
        state
    }

    pub async fn metrics(&self) -> SyncMetrics {
        self.engine.metrics().await
    }

    pub fn background_support(&self) -> BackgroundSupport {
        self.background
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stop taking triggers and wait for a drain in flight to finish
    ///
    /// Triggers still queued are discarded.
    pub async fn shutdown(&mut self) {
        let Some(task) = self.task.take() else {
            return;
        };
        // The task may already be gone; then there is nobody to tell
        let _ = self.stop_tx.send(true);
        if let Err(e) = task.await {
            tracing::error!(error = %e, "Trigger coordinator task failed");
        }
    }
}
