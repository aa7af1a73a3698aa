//! Booking Snapshot and Outbox Types
//!
//! Platform-neutral data structures for the front-desk client: the cached
//! read-model of a booking and the pending check-in/check-out intents that
//! wait in the outbox until the remote authority confirms them.
//!
//! # Types
//!
//! - `BookingSnapshot` - last known server state of one booking
//! - `BookingStatus` - guest-stay lifecycle value
//! - `ActionKind` - CHECK_IN or CHECK_OUT
//! - `PendingAction` - one outbox entry with its synced flag and retry counter
//!
//! All timestamps are epoch milliseconds.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::shared::error::SharedError;

/// Guest-stay lifecycle status of a booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Awaiting hotel confirmation
    Pending,
    /// Confirmed, guest not yet arrived
    Confirmed,
    /// Guest is in house
    CheckedIn,
    /// Guest has left
    CheckedOut,
    /// Booking was cancelled
    Cancelled,
    /// Guest never arrived
    NoShow,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::CheckedIn => "checked_in",
            BookingStatus::CheckedOut => "checked_out",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::NoShow => "no_show",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "checked_in" => Ok(BookingStatus::CheckedIn),
            "checked_out" => Ok(BookingStatus::CheckedOut),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "no_show" => Ok(BookingStatus::NoShow),
            other => Err(SharedError::validation(
                "status",
                format!("unknown booking status '{}'", other),
            )),
        }
    }
}

/// Cached, non-authoritative view of a booking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSnapshot {
    /// Booking id (unique)
    pub id: String,
    pub guest_name: String,
    pub guest_phone: String,
    pub room_name: String,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub status: BookingStatus,
    /// Owning hotel
    pub hotel_id: String,
    /// When this snapshot was taken from the server
    pub cached_at: i64,
}

/// The two front-desk intents the outbox can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    CheckIn,
    CheckOut,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::CheckIn => "CHECK_IN",
            ActionKind::CheckOut => "CHECK_OUT",
        }
    }

    /// Status the UI should show while the action waits for confirmation
    pub fn projected_status(&self) -> BookingStatus {
        match self {
            ActionKind::CheckIn => BookingStatus::CheckedIn,
            ActionKind::CheckOut => BookingStatus::CheckedOut,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CHECK_IN" => Ok(ActionKind::CheckIn),
            "CHECK_OUT" => Ok(ActionKind::CheckOut),
            other => Err(SharedError::validation(
                "kind",
                format!("unknown action kind '{}'", other),
            )),
        }
    }
}

/// Outbox entry awaiting confirmation from the remote authority
///
/// The kind is fixed at creation; to change an intent, cancel the entry and
/// enqueue a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingAction {
    /// Client-generated action id
    pub id: String,
    pub booking_id: String,
    pub kind: ActionKind,
    pub created_at: i64,
    pub synced: bool,
    pub retry_count: u32,
    /// Time of the last failed attempt, if any
    pub last_attempt_at: Option<i64>,
    /// Error message from the last failed attempt
    pub last_error: Option<String>,
}

impl PendingAction {
    /// Create a fresh, unsynced action with a random id
    pub fn new(booking_id: impl Into<String>, kind: ActionKind, created_at: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            booking_id: booking_id.into(),
            kind,
            created_at,
            synced: false,
            retry_count: 0,
            last_attempt_at: None,
            last_error: None,
        }
    }

    /// Unsynced and out of automatic retries
    pub fn is_dead(&self, max_retries: u32) -> bool {
        !self.synced && self.retry_count >= max_retries
    }

    /// Unsynced and still eligible for automatic retry
    pub fn is_pending(&self, max_retries: u32) -> bool {
        !self.synced && self.retry_count < max_retries
    }
}
