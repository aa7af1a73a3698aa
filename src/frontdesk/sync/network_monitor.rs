//! # Network Monitor
//!
//! Connectivity source for the trigger coordinator.
//!
//! A `ConnectivityPort` answers three things: whether the device is online
//! right now, who to call when it goes from offline to online, and whether
//! the platform can run periodic background work. `NetworkMonitor` is the
//! real adapter, fed by an HTTP reachability probe or by the host calling
//! `set_status`. `InMemoryConnectivity` is a scripted stand-in for tests.

use crate::frontdesk::remote::RemoteError;
use crate::shared::config::AppConfig;
use serde::Serialize;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Callback fired by a connectivity source; must not block
pub type TriggerCallback = Arc<dyn Fn() + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NetworkStatus {
    Online,
    Offline,
    /// Nothing observed yet; treated as offline
    Unknown,
}

impl NetworkStatus {
    pub fn is_online(self) -> bool {
        matches!(self, NetworkStatus::Online)
    }
}

/// Result of asking for periodic background work
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundSupport {
    Registered,
    /// The platform has no background scheduler; the other triggers still work
    Unavailable,
}

pub trait ConnectivityPort: Send + Sync {
    fn is_online(&self) -> bool;

    /// Call `callback` on every offline to online edge
    fn on_transition_to_online(&self, callback: TriggerCallback);

    /// Call `callback` periodically while the app is backgrounded
    fn register_background_trigger(&self, callback: TriggerCallback) -> BackgroundSupport;
}

/// Status plus online-edge listeners, shared by both adapters
struct Transitions {
    status: RwLock<NetworkStatus>,
    listeners: Mutex<Vec<TriggerCallback>>,
}

impl Transitions {
    fn new(initial: NetworkStatus) -> Self {
        Self {
            status: RwLock::new(initial),
            listeners: Mutex::new(Vec::new()),
        }
    }

    fn current(&self) -> NetworkStatus {
        self.status
            .read()
            .map(|s| *s)
            .unwrap_or(NetworkStatus::Unknown)
    }

    fn listen(&self, callback: TriggerCallback) {
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.push(callback);
        }
    }

    fn listener_count(&self) -> usize {
        self.listeners.lock().map(|l| l.len()).unwrap_or(0)
    }

    /// Store `next`, firing listeners on an offline to online edge
    fn set(&self, next: NetworkStatus) -> bool {
        let was_online = match self.status.write() {
            Ok(mut status) => {
                let previous = *status;
                *status = next;
                previous.is_online()
            }
            Err(_) => return false,
        };

        if was_online || !next.is_online() {
            return false;
        }

        // Invoke outside the lock so listeners may query the status
        let listeners = self
            .listeners
            .lock()
            .map(|l| l.clone())
            .unwrap_or_default();
        for listener in &listeners {
            listener();
        }
        true
    }
}

/// Connectivity adapter backed by a reachability probe
pub struct NetworkMonitor {
    transitions: Arc<Transitions>,
    background_interval: Option<Duration>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl std::fmt::Debug for NetworkMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkMonitor")
            .field("status", &self.transitions.current())
            .field("background_interval", &self.background_interval)
            .finish()
    }
}

impl Default for NetworkMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl NetworkMonitor {
    pub fn new() -> Self {
        Self {
            transitions: Arc::new(Transitions::new(NetworkStatus::Unknown)),
            background_interval: None,
            tasks: Mutex::new(Vec::new()),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new().with_background_interval(config.background_interval)
    }

    pub fn with_background_interval(mut self, interval: Option<Duration>) -> Self {
        self.background_interval = interval;
        self
    }

    pub fn get_status(&self) -> NetworkStatus {
        self.transitions.current()
    }

    /// Report a status observed by the host; returns true on an online edge
    pub fn set_status(&self, status: NetworkStatus) -> bool {
        let edge = self.transitions.set(status);
        if edge {
            tracing::info!("Network came back online");
        }
        edge
    }

    /// Probe `url` every `interval`
    ///
    /// Any HTTP response, whatever its status, counts as reachable.
    pub fn spawn_probe(
        &self,
        url: String,
        interval: Duration,
        timeout: Duration,
    ) -> Result<(), RemoteError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let transitions = Arc::clone(&self.transitions);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let status = match client.head(&url).send().await {
                    Ok(_) => NetworkStatus::Online,
                    Err(e) => {
                        tracing::debug!(%url, error = %e, "Reachability probe failed");
                        NetworkStatus::Offline
                    }
                };
                let previous = transitions.current();
                if transitions.set(status) {
                    tracing::info!("Network came back online");
                } else if previous != status {
                    tracing::info!(?status, "Network status changed");
                }
            }
        });

        self.track(handle);
        Ok(())
    }

    fn track(&self, handle: JoinHandle<()>) {
        if let Ok(mut tasks) = self.tasks.lock() {
            tasks.push(handle);
        }
    }

    /// Stop the probe and background timers
    pub fn stop(&self) {
        if let Ok(mut tasks) = self.tasks.lock() {
            for task in tasks.drain(..) {
                task.abort();
            }
        }
    }
}

impl Drop for NetworkMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}

impl ConnectivityPort for NetworkMonitor {
    fn is_online(&self) -> bool {
        self.get_status().is_online()
    }

    fn on_transition_to_online(&self, callback: TriggerCallback) {
        self.transitions.listen(callback);
    }

    fn register_background_trigger(&self, callback: TriggerCallback) -> BackgroundSupport {
        let Some(interval) = self.background_interval else {
            return BackgroundSupport::Unavailable;
        };
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("No async runtime; background sync unavailable");
            return BackgroundSupport::Unavailable;
        };

        let transitions = Arc::clone(&self.transitions);
        let handle = runtime.spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // First tick completes immediately; startup is covered elsewhere
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if transitions.current().is_online() {
                    callback();
                }
            }
        });
        self.track(handle);
        BackgroundSupport::Registered
    }
}

/// Scripted connectivity for tests and headless hosts
pub struct InMemoryConnectivity {
    transitions: Transitions,
    background: Option<Mutex<Vec<TriggerCallback>>>,
}

impl InMemoryConnectivity {
    pub fn new(online: bool) -> Self {
        let status = if online {
            NetworkStatus::Online
        } else {
            NetworkStatus::Offline
        };
        Self {
            transitions: Transitions::new(status),
            background: None,
        }
    }

    /// Accept background trigger registrations
    pub fn with_background_support(mut self) -> Self {
        self.background = Some(Mutex::new(Vec::new()));
        self
    }

    /// Returns true when this produced an online edge
    pub fn set_online(&self, online: bool) -> bool {
        let status = if online {
            NetworkStatus::Online
        } else {
            NetworkStatus::Offline
        };
        self.transitions.set(status)
    }

    /// Fire every registered background trigger; returns how many fired
    pub fn fire_background(&self) -> usize {
        let callbacks = match &self.background {
            Some(registered) => registered.lock().map(|c| c.clone()).unwrap_or_default(),
            None => return 0,
        };
        for callback in &callbacks {
            callback();
        }
        callbacks.len()
    }

    pub fn online_listener_count(&self) -> usize {
        self.transitions.listener_count()
    }
}

impl ConnectivityPort for InMemoryConnectivity {
    fn is_online(&self) -> bool {
        self.transitions.current().is_online()
    }

    fn on_transition_to_online(&self, callback: TriggerCallback) {
        self.transitions.listen(callback);
    }

    fn register_background_trigger(&self, callback: TriggerCallback) -> BackgroundSupport {
        match &self.background {
            Some(registered) => {
                if let Ok(mut callbacks) = registered.lock() {
                    callbacks.push(callback);
                }
                BackgroundSupport::Registered
            }
            None => BackgroundSupport::Unavailable,
        }
    }
}
