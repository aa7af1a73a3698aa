//! Outbox queue operations

use crate::common::{snapshot, ScriptedRemote, TestStore};
use frontdesk_sync::shared::{ActionKind, BookingStatus};
use pretty_assertions::assert_eq;
use std::sync::Arc;

#[tokio::test]
async fn test_enqueue_without_snapshot_succeeds() {
    let store = TestStore::new().await;
    let action = store.outbox.enqueue("B404", ActionKind::CheckOut).await.unwrap();

    assert!(store.cache.get("B404").await.unwrap().is_none());
    let unsynced = store.outbox.list_unsynced().await.unwrap();
    assert_eq!(unsynced, vec![action]);
}

#[tokio::test]
async fn test_enqueue_projects_status() {
    let store = TestStore::new().await;
    store.cache.refresh(vec![snapshot("B1")]).await.unwrap();

    store.outbox.enqueue("B1", ActionKind::CheckIn).await.unwrap();
    assert_eq!(
        store.cache.get("B1").await.unwrap().unwrap().status,
        BookingStatus::CheckedIn
    );

    store.outbox.enqueue("B1", ActionKind::CheckOut).await.unwrap();
    assert_eq!(
        store.cache.get("B1").await.unwrap().unwrap().status,
        BookingStatus::CheckedOut
    );
}

#[tokio::test]
async fn test_mark_synced_twice_is_a_no_op() {
    let store = TestStore::new().await;
    let action = store.outbox.enqueue("B1", ActionKind::CheckIn).await.unwrap();

    assert!(store.outbox.mark_synced(&action.id).await.unwrap());
    let once = store.outbox.get(&action.id).await.unwrap();
    assert!(!store.outbox.mark_synced(&action.id).await.unwrap());
    let twice = store.outbox.get(&action.id).await.unwrap();

    assert_eq!(once, twice);
    assert!(store.outbox.list_unsynced().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_increment_retry_on_missing_action() {
    let store = TestStore::new().await;
    let bumped = store.outbox.increment_retry("gone", Some("timeout")).await.unwrap();
    assert_eq!(bumped, None);
}

#[tokio::test]
async fn test_cancel_only_touches_unsynced() {
    let store = TestStore::new().await;
    let pending = store.outbox.enqueue("B1", ActionKind::CheckIn).await.unwrap();
    let synced = store.outbox.enqueue("B2", ActionKind::CheckIn).await.unwrap();
    store.outbox.mark_synced(&synced.id).await.unwrap();

    assert!(store.outbox.cancel(&pending.id).await.unwrap());
    assert!(!store.outbox.cancel(&synced.id).await.unwrap());
    assert!(store.outbox.get(&synced.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_resubmit_dead_action() {
    let store = TestStore::new().await;
    let remote = Arc::new(ScriptedRemote::responding(500));
    let engine = store.engine(remote.clone());
    let dead = store.outbox.enqueue("B1", ActionKind::CheckIn).await.unwrap();
    for _ in 0..3 {
        engine.drain().await.unwrap();
    }
    assert_eq!(store.outbox.count_pending().await.unwrap(), 0);

    let fresh = store.outbox.resubmit(&dead.id).await.unwrap().unwrap();
    assert_ne!(fresh.id, dead.id);
    assert_eq!(fresh.retry_count, 0);
    assert_eq!(fresh.kind, ActionKind::CheckIn);
    assert!(store.outbox.get(&dead.id).await.unwrap().is_none());

    remote.respond_with(200);
    crate::assert_drain!(engine.drain().await.unwrap(), synced: 1, failed: 0, pending: 0);
}

#[tokio::test]
async fn test_resubmit_ignores_live_action() {
    let store = TestStore::new().await;
    let live = store.outbox.enqueue("B1", ActionKind::CheckIn).await.unwrap();
    assert!(store.outbox.resubmit(&live.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_store_reopens_with_outbox_intact() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("local.db");

    let first = frontdesk_sync::frontdesk::LocalDatabase::open(&path).await.unwrap();
    let store = TestStore::with_db(first.clone());
    let action = store.outbox.enqueue("B1", ActionKind::CheckIn).await.unwrap();
    first.close().await;

    let reopened = frontdesk_sync::frontdesk::LocalDatabase::open(&path).await.unwrap();
    let store = TestStore::with_db(reopened.clone());
    assert_eq!(store.outbox.list_unsynced().await.unwrap(), vec![action]);
    reopened.close().await;
}
