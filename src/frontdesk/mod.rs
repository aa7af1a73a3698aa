//! Front-Desk Client Module
//!
//! Offline-first side of the hotel front desk: bookings are read from a local
//! cache, check-ins and check-outs are recorded in a local outbox, and the
//! outbox is replayed against the booking server whenever connectivity
//! allows.
//!
//! # Architecture
//!
//! - **`local_db`** - SQLite store holding booking snapshots and the outbox
//! - **`offline`** - Outbox queue, booking cache and retry policy
//! - **`sync`** - Drain engine, connectivity port and trigger coordinator
//! - **`remote`** - HTTP client for the booking server
//! - **`config`** - Server URL, store location and bearer token
//! - **`error`** - Sync error categories
//! - **`main`** - Headless sync agent (binary)
//!
//! # Module Structure
//!
//! ```text
//! frontdesk/
//! ├── mod.rs       - Module exports and documentation
//! ├── main.rs      - Sync agent entry point
//! ├── config.rs    - Configuration management
//! ├── error.rs     - SyncError
//! ├── remote.rs    - RemoteAuthority and its HTTP implementation
//! ├── local_db/    - Store lifecycle, schema, bookings, pending actions
//! ├── offline/     - OutboxQueue, CacheManager, RetryPolicy
//! └── sync/        - SyncEngine, NetworkMonitor, TriggerCoordinator
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use frontdesk_sync::frontdesk::{
//!     Config, HttpRemoteAuthority, LocalDatabase, NetworkMonitor, OutboxQueue, SyncEngine,
//!     TriggerCoordinator,
//! };
//! use frontdesk_sync::shared::{ActionKind, SystemClock};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::from_env()?;
//! let db = LocalDatabase::open(config.database_path()).await?;
//! let clock = Arc::new(SystemClock);
//!
//! let outbox = OutboxQueue::new(db.clone(), clock.clone());
//! outbox.enqueue("B1", ActionKind::CheckIn).await?;
//!
//! let remote = Arc::new(HttpRemoteAuthority::new(config.clone())?);
//! let engine = Arc::new(SyncEngine::new(outbox, remote, clock).configured(config.app()));
//! let handle = TriggerCoordinator::attach(engine, Arc::new(NetworkMonitor::new()));
//! handle.request_drain();
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod local_db;
pub mod offline;
pub mod remote;
pub mod sync;

// Re-export commonly used types
pub use config::Config;
pub use error::SyncError;
pub use local_db::{DatabaseStats, LocalDatabase, StorageError};
pub use offline::{BackoffStrategy, CacheManager, OutboxQueue, RetryDecision, RetryPolicy};
pub use remote::{HttpRemoteAuthority, RemoteAuthority, RemoteError};
pub use sync::{
    BackgroundSupport, ConnectivityPort, CoordinatorHandle, DrainOutcome, DrainReport, DrainResult,
    InMemoryConnectivity, NetworkMonitor, NetworkStatus, SyncEngine, SyncMetrics, SyncState,
    Trigger, TriggerCoordinator,
};
