//! Shared Error Types
//!
//! Error types for the platform-neutral data model. These represent failures
//! that can occur wherever bookings and outbox entries are parsed from their
//! stored text form.
//!
//! # Error Categories
//!
//! - `ValidationError` - a field holds a value outside its domain
//!
//! # Usage
//!
//! ```rust
//! use frontdesk_sync::shared::error::SharedError;
//!
//! let error = SharedError::validation("status", "unknown booking status 'arrived'");
//! ```
use thiserror::Error;

/// Shared error types for the booking and outbox model
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },
}

impl SharedError {
    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }
}
