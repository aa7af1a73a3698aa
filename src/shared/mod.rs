//! Shared Module
//!
//! Types and data structures that do not depend on the client runtime:
//! the booking/outbox data model, error types, configuration and the clock
//! abstraction.
//!
//! # Overview
//!
//! Everything here is plain data or a small trait, so it can be reused by
//! other front-desk surfaces and serialized over HTTP.

/// Booking snapshot and pending action types
pub mod booking;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Wall-clock abstraction
pub mod clock;

/// Re-export commonly used types for convenience
pub use booking::{ActionKind, BookingSnapshot, BookingStatus, PendingAction};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
pub use error::SharedError;
