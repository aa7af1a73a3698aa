//! Front Desk Sync - Main Library
//!
//! Offline-first action queue and sync engine for a hotel front desk. Staff
//! keep checking guests in and out while the network is down; every action
//! is recorded locally, reflected on the cached booking immediately, and
//! replayed against the booking server once connectivity returns.
//!
//! # Module Structure
//!
//! - **`shared`** - Types shared by every layer
//!   - Booking snapshots, pending actions, action kinds
//!   - Clock abstraction
//!   - Application configuration
//!   - Error types
//!
//! - **`frontdesk`** - The offline client
//!   - SQLite store with an explicit open/close lifecycle
//!   - Outbox queue and booking cache
//!   - Sync engine with retry cap and retention cleanup
//!   - Connectivity port and trigger coordinator
//!   - HTTP client for the booking server
//!
//! # Delivery Guarantees
//!
//! Actions are delivered at least once, in the order they were recorded.
//! The booking server must treat a repeated check-in or check-out as a
//! successful no-op, since an acknowledgement lost in transit looks the same
//! as a request that never arrived.
//!
//! After `max_retries` failed attempts (3 by default) an action is dead: it
//! stays in the outbox for diagnostics but is never attempted automatically
//! again. Drains report dead actions through `DrainResult::failed`.
//!
//! # Thread Safety
//!
//! - The store is a pooled `SqlitePool`; handles are cheap to clone
//! - Only one drain runs at a time per `SyncEngine`
//! - Coordinator state is shared through `Arc<RwLock<>>` and `broadcast::Sender`
//!
//! # Error Handling
//!
//! - `StorageError` for the local store
//! - `RemoteError` for the booking server
//! - `SyncError` for drains, separating local faults from network failures
//! - `ConfigError` and `SharedError` for configuration and validation

/// Shared types and data structures
pub mod shared;

/// Offline client: store, outbox, cache and sync
pub mod frontdesk;
