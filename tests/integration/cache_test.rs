//! Booking cache: staleness and atomic replacement

use crate::common::{snapshot, TestStore};
use frontdesk_sync::frontdesk::LocalDatabase;
use frontdesk_sync::shared::{ActionKind, BookingSnapshot, BookingStatus};
use pretty_assertions::assert_eq;
use std::time::Duration;

#[tokio::test]
async fn test_staleness_follows_cache_age() {
    let store = TestStore::new().await;
    assert!(store.cache.is_stale().await.unwrap());

    store.cache.refresh(vec![snapshot("B1")]).await.unwrap();
    assert!(!store.cache.is_stale().await.unwrap());

    store.clock.advance(Duration::from_secs(6 * 60));
    assert!(store.cache.is_stale().await.unwrap());
}

#[tokio::test]
async fn test_refresh_overwrites_optimistic_projection() {
    let store = TestStore::new().await;
    store.cache.refresh(vec![snapshot("B1")]).await.unwrap();

    store.outbox.enqueue("B1", ActionKind::CheckIn).await.unwrap();
    assert_eq!(
        store.cache.get("B1").await.unwrap().unwrap().status,
        BookingStatus::CheckedIn
    );

    // The server has not applied the check-in yet
    store.cache.refresh(vec![snapshot("B1")]).await.unwrap();
    assert_eq!(
        store.cache.get("B1").await.unwrap().unwrap().status,
        BookingStatus::Confirmed
    );
}

#[tokio::test]
async fn test_refresh_drops_bookings_missing_from_server() {
    let store = TestStore::new().await;
    store
        .cache
        .refresh(vec![snapshot("B1"), snapshot("B2")])
        .await
        .unwrap();
    store.cache.refresh(vec![snapshot("B2")]).await.unwrap();

    let ids: Vec<String> = store
        .cache
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|b| b.id)
        .collect();
    assert_eq!(ids, vec!["B2".to_string()]);
}

fn generation(prefix: &str, count: usize) -> Vec<BookingSnapshot> {
    (0..count)
        .map(|i| snapshot(&format!("{}-{:03}", prefix, i)))
        .collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_reader_never_sees_mixed_generations() {
    let dir = tempfile::tempdir().unwrap();
    let db = LocalDatabase::open(dir.path().join("local.db")).await.unwrap();
    let writer = TestStore::with_db(db.clone());
    let reader = TestStore::with_db(db.clone());

    let old = generation("old", 40);
    let new = generation("new", 40);
    writer.cache.replace_all(&old).await.unwrap();

    let write_task = tokio::spawn(async move {
        for round in 0..30 {
            let next = if round % 2 == 0 { &new } else { &old };
            writer.cache.replace_all(next).await.unwrap();
        }
    });

    let read_task = tokio::spawn(async move {
        for _ in 0..200 {
            let seen = reader.cache.list().await.unwrap();
            assert_eq!(seen.len(), 40, "partial replacement observed");
            let first_prefix = &seen[0].id[..3];
            assert!(
                seen.iter().all(|b| b.id.starts_with(first_prefix)),
                "mixed generations observed"
            );
            tokio::task::yield_now().await;
        }
    });

    write_task.await.unwrap();
    read_task.await.unwrap();
    db.close().await;
}

#[tokio::test]
async fn test_indexed_queries() {
    let store = TestStore::new().await;
    let mut later = snapshot("B2");
    later.check_in_date = later.check_in_date.succ_opt().unwrap();
    later.status = BookingStatus::CheckedIn;
    store
        .cache
        .refresh(vec![snapshot("B1"), later])
        .await
        .unwrap();

    let arriving = store
        .cache
        .arriving_on(chrono::NaiveDate::from_ymd_opt(2026, 10, 16).unwrap())
        .await
        .unwrap();
    assert_eq!(arriving.len(), 1);
    assert_eq!(arriving[0].id, "B1");

    let in_house = store.cache.with_status(BookingStatus::CheckedIn).await.unwrap();
    assert_eq!(in_house.len(), 1);
    assert_eq!(in_house[0].id, "B2");
}
