//! # Offline Front-Desk Actions
//!
//! Offline-first recording of guest check-ins and check-outs.
//!
//! ## Architecture
//!
//! - **Outbox Queue**: durable log of actions awaiting the remote authority,
//!   with an optimistic status projection onto the cached booking
//! - **Booking Cache**: last known server state of the booking list plus
//!   staleness queries
//! - **Retry Policy**: retry cap and optional backoff used by the sync engine
//!
//! ## Key Components
//!
//! - `queue.rs`: `OutboxQueue`
//! - `cache.rs`: `CacheManager`
//! - `retry.rs`: `RetryPolicy`, `BackoffStrategy`
//!
//! ## Usage
//!
//! ```rust,no_run
//! use frontdesk_sync::frontdesk::local_db::LocalDatabase;
//! use frontdesk_sync::frontdesk::offline::{CacheManager, OutboxQueue};
//! use frontdesk_sync::shared::{ActionKind, SystemClock};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), frontdesk_sync::frontdesk::local_db::StorageError> {
//! let db = LocalDatabase::open_in_memory().await?;
//! let clock = Arc::new(SystemClock);
//! let cache = CacheManager::new(db.clone(), clock.clone());
//! let outbox = OutboxQueue::new(db, clock);
//!
//! outbox.enqueue("B1", ActionKind::CheckIn).await?;
//! if cache.is_stale().await? {
//!     // ask the booking list screen to refetch
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod queue;
pub mod retry;

pub use cache::CacheManager;
pub use queue::OutboxQueue;
pub use retry::{BackoffStrategy, RetryDecision, RetryPolicy};
