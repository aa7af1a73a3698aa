//! # Booking Cache
//!
//! Maintains the local snapshot of the booking list that front-desk staff
//! work from while offline, and answers staleness questions about it.
//!
//! Staleness is advisory. A stale cache tells the UI to refetch; it never
//! blocks the outbox or the sync engine.

use crate::frontdesk::local_db::{LocalDatabase, Result};
use crate::shared::booking::{BookingSnapshot, BookingStatus};
use crate::shared::clock::Clock;
use crate::shared::config::{AppConfig, DEFAULT_STALE_AFTER};
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;

/// Cache of booking snapshots
#[derive(Debug, Clone)]
pub struct CacheManager {
    db: LocalDatabase,
    clock: Arc<dyn Clock>,
    stale_after: Duration,
}

impl CacheManager {
    pub fn new(db: LocalDatabase, clock: Arc<dyn Clock>) -> Self {
        Self {
            db,
            clock,
            stale_after: DEFAULT_STALE_AFTER,
        }
    }

    /// Apply the staleness threshold from application config
    pub fn configured(self, config: &AppConfig) -> Self {
        self.with_stale_after(config.stale_after)
    }

    pub fn with_stale_after(mut self, stale_after: Duration) -> Self {
        self.stale_after = stale_after;
        self
    }

    /// Swap in a freshly fetched booking list, stamped with the current time
    pub async fn refresh(&self, mut bookings: Vec<BookingSnapshot>) -> Result<()> {
        let now = self.clock.now_millis();
        for booking in &mut bookings {
            booking.cached_at = now;
        }
        self.replace_all(&bookings).await
    }

    /// Swap the whole cache in one transaction, keeping the given timestamps
    pub async fn replace_all(&self, bookings: &[BookingSnapshot]) -> Result<()> {
        self.db.replace_bookings(bookings).await?;
        tracing::info!(count = bookings.len(), "Replaced booking cache");
        Ok(())
    }

    pub async fn clear(&self) -> Result<u64> {
        let removed = self.db.clear_bookings().await?;
        tracing::info!(removed, "Cleared booking cache");
        Ok(removed)
    }

    pub async fn get(&self, booking_id: &str) -> Result<Option<BookingSnapshot>> {
        self.db.get_booking(booking_id).await
    }

    pub async fn list(&self) -> Result<Vec<BookingSnapshot>> {
        self.db.all_bookings().await
    }

    pub async fn with_status(&self, status: BookingStatus) -> Result<Vec<BookingSnapshot>> {
        self.db.bookings_by_status(status).await
    }

    /// Bookings whose stay starts on `date`
    pub async fn arriving_on(&self, date: NaiveDate) -> Result<Vec<BookingSnapshot>> {
        self.db.bookings_checking_in_on(date).await
    }

    /// Age of the oldest snapshot; `None` when the cache is empty
    pub async fn cache_age(&self) -> Result<Option<Duration>> {
        let oldest = self.db.oldest_cached_at().await?;
        Ok(oldest.map(|cached_at| {
            let age = self.clock.now_millis().saturating_sub(cached_at).max(0);
            Duration::from_millis(age as u64)
        }))
    }

    /// True when the cache is empty or older than the threshold
    pub async fn is_stale(&self) -> Result<bool> {
        Ok(match self.cache_age().await? {
            Some(age) => age > self.stale_after,
            None => true,
        })
    }
}
