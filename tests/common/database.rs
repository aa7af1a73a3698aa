//! Store fixtures
//!
//! Every test gets a fresh in-memory store, so nothing leaks between tests.

use chrono::NaiveDate;
use frontdesk_sync::frontdesk::{CacheManager, LocalDatabase, OutboxQueue, RemoteAuthority, SyncEngine};
use frontdesk_sync::shared::{BookingSnapshot, BookingStatus, ManualClock};
use std::sync::Arc;

/// Arbitrary fixed start time, 2026-10-16T00:00:00Z
pub const T0: i64 = 1_792_108_800_000;

pub struct TestStore {
    pub db: LocalDatabase,
    pub clock: Arc<ManualClock>,
    pub outbox: OutboxQueue,
    pub cache: CacheManager,
}

impl TestStore {
    pub async fn new() -> Self {
        let db = LocalDatabase::open_in_memory()
            .await
            .expect("Failed to open in-memory store");
        Self::with_db(db)
    }

    pub fn with_db(db: LocalDatabase) -> Self {
        let clock = Arc::new(ManualClock::new(T0));
        let outbox = OutboxQueue::new(db.clone(), clock.clone());
        let cache = CacheManager::new(db.clone(), clock.clone());
        Self {
            db,
            clock,
            outbox,
            cache,
        }
    }

    /// Engine over this store's outbox and clock
    pub fn engine(&self, remote: Arc<dyn RemoteAuthority>) -> SyncEngine {
        SyncEngine::new(self.outbox.clone(), remote, self.clock.clone())
    }
}

/// Confirmed booking arriving on 2026-10-16
pub fn snapshot(id: &str) -> BookingSnapshot {
    BookingSnapshot {
        id: id.to_string(),
        guest_name: format!("Guest {}", id),
        guest_phone: "+1 555 0100".to_string(),
        room_name: "101".to_string(),
        check_in_date: NaiveDate::from_ymd_opt(2026, 10, 16).expect("valid date"),
        check_out_date: NaiveDate::from_ymd_opt(2026, 10, 19).expect("valid date"),
        status: BookingStatus::Confirmed,
        hotel_id: "H1".to_string(),
        cached_at: 0,
    }
}
