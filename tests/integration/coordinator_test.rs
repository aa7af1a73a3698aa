//! Trigger coordinator wired to the in-memory connectivity adapter

use crate::common::{ScriptedRemote, TestStore};
use assert_matches::assert_matches;
use frontdesk_sync::frontdesk::{
    BackgroundSupport, DrainOutcome, DrainReport, DrainResult, InMemoryConnectivity, NetworkStatus,
    Trigger, TriggerCoordinator,
};
use frontdesk_sync::shared::ActionKind;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

async fn next_report(reports: &mut broadcast::Receiver<DrainReport>) -> DrainReport {
    tokio::time::timeout(Duration::from_secs(5), reports.recv())
        .await
        .expect("no drain report within 5s")
        .expect("report channel closed")
}

fn completed(synced: u64, failed: u64, pending: u64) -> DrainOutcome {
    DrainOutcome::Completed(DrainResult {
        synced,
        failed,
        pending,
    })
}

#[tokio::test]
async fn test_startup_drain_when_online() {
    let store = TestStore::new().await;
    store.outbox.enqueue("B1", ActionKind::CheckIn).await.unwrap();
    let remote = Arc::new(ScriptedRemote::accepting());
    let engine = Arc::new(store.engine(remote.clone()));

    let handle = TriggerCoordinator::attach(engine, Arc::new(InMemoryConnectivity::new(true)));
    let mut reports = handle.subscribe();

    let report = next_report(&mut reports).await;
    assert_eq!(report.trigger, Trigger::Startup);
    assert_eq!(report.outcome, completed(1, 0, 0));
    assert_eq!(remote.call_count(), 1);
}

#[tokio::test]
async fn test_no_startup_drain_when_offline() {
    let store = TestStore::new().await;
    store.outbox.enqueue("B1", ActionKind::CheckIn).await.unwrap();
    let remote = Arc::new(ScriptedRemote::accepting());
    let port = Arc::new(InMemoryConnectivity::new(false));

    let handle = TriggerCoordinator::attach(Arc::new(store.engine(remote.clone())), port.clone());
    let mut reports = handle.subscribe();
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }

    assert!(reports.try_recv().is_err());
    assert_eq!(remote.call_count(), 0);
    assert_eq!(handle.status().await.network_status, NetworkStatus::Offline);
}

#[tokio::test]
async fn test_online_edge_triggers_drain() {
    let store = TestStore::new().await;
    let remote = Arc::new(ScriptedRemote::accepting());
    let port = Arc::new(InMemoryConnectivity::new(false));
    let handle = TriggerCoordinator::attach(Arc::new(store.engine(remote.clone())), port.clone());
    let mut reports = handle.subscribe();
    assert_eq!(port.online_listener_count(), 1);

    // Queued while offline
    store.outbox.enqueue("B1", ActionKind::CheckIn).await.unwrap();
    store.outbox.enqueue("B1", ActionKind::CheckOut).await.unwrap();

    assert!(port.set_online(true));
    let report = next_report(&mut reports).await;
    assert_eq!(report.trigger, Trigger::Online);
    assert_eq!(report.outcome, completed(2, 0, 0));

    // Level, not edge: staying online does not drain again
    assert!(!port.set_online(true));
    let status = handle.status().await;
    assert_eq!(status.last_result, Some(DrainResult { synced: 2, failed: 0, pending: 0 }));
    assert_eq!(status.network_status, NetworkStatus::Online);
    assert_eq!(remote.call_count(), 2);
}

#[tokio::test]
async fn test_background_trigger_drains() {
    let store = TestStore::new().await;
    let remote = Arc::new(ScriptedRemote::accepting());
    let port = Arc::new(InMemoryConnectivity::new(false).with_background_support());
    let handle = TriggerCoordinator::attach(Arc::new(store.engine(remote.clone())), port.clone());
    let mut reports = handle.subscribe();
    assert_eq!(handle.background_support(), BackgroundSupport::Registered);

    store.outbox.enqueue("B7", ActionKind::CheckOut).await.unwrap();
    assert_eq!(port.fire_background(), 1);

    let report = next_report(&mut reports).await;
    assert_eq!(report.trigger, Trigger::Background);
    assert_eq!(report.outcome, completed(1, 0, 0));
}

#[tokio::test]
async fn test_missing_background_facility_is_not_an_error() {
    let store = TestStore::new().await;
    let port = Arc::new(InMemoryConnectivity::new(false));
    let handle = TriggerCoordinator::attach(
        Arc::new(store.engine(Arc::new(ScriptedRemote::accepting()))),
        port.clone(),
    );

    assert_eq!(handle.background_support(), BackgroundSupport::Unavailable);
    assert_eq!(port.fire_background(), 0);
    assert!(handle.is_running());
}

#[tokio::test]
async fn test_burst_of_triggers_never_overlaps() {
    let store = TestStore::new().await;
    store.outbox.enqueue("B1", ActionKind::CheckIn).await.unwrap();
    let remote = Arc::new(ScriptedRemote::accepting().gated());
    let port = Arc::new(InMemoryConnectivity::new(false));
    let engine = Arc::new(store.engine(remote.clone()));
    let handle = TriggerCoordinator::attach(Arc::clone(&engine), port.clone());
    let mut reports = handle.subscribe();

    assert!(handle.request_drain());
    while remote.call_count() == 0 {
        tokio::task::yield_now().await;
    }
    assert!(handle.status().await.is_syncing);

    // Flapping while the first drain is still waiting on the server
    port.set_online(true);
    port.set_online(false);
    port.set_online(true);
    handle.request_drain();

    remote.release(10);
    let first = next_report(&mut reports).await;
    assert_eq!(first.trigger, Trigger::Manual);
    assert_eq!(first.outcome, completed(1, 0, 0));

    // The queued triggers fold into one follow-up drain with nothing to send
    let second = next_report(&mut reports).await;
    assert_eq!(second.outcome, completed(0, 0, 0));
    assert_eq!(remote.call_count(), 1);
    assert_eq!(engine.metrics().await.overlapping_drains, 0);
}

#[tokio::test]
async fn test_storage_fault_is_reported() {
    let store = TestStore::new().await;
    let handle = TriggerCoordinator::attach(
        Arc::new(store.engine(Arc::new(ScriptedRemote::accepting()))),
        Arc::new(InMemoryConnectivity::new(false)),
    );
    let mut reports = handle.subscribe();

    store.db.close().await;
    handle.request_drain();

    let report = next_report(&mut reports).await;
    assert_matches!(report.outcome, DrainOutcome::Faulted(_));
    let status = handle.status().await;
    assert!(status.last_error.is_some());
    assert!(status.needs_attention());
}

#[tokio::test]
async fn test_shutdown_waits_for_running_drain() {
    let store = TestStore::new().await;
    store.outbox.enqueue("B1", ActionKind::CheckIn).await.unwrap();
    let remote = Arc::new(ScriptedRemote::accepting().gated());
    let mut handle = TriggerCoordinator::attach(
        Arc::new(store.engine(remote.clone())),
        Arc::new(InMemoryConnectivity::new(false)),
    );
    let mut reports = handle.subscribe();

    assert!(handle.request_drain());
    while remote.call_count() == 0 {
        tokio::task::yield_now().await;
    }
    // Queued behind the running drain; discarded by shutdown
    assert!(handle.request_drain());

    tokio::join!(handle.shutdown(), async {
        tokio::task::yield_now().await;
        remote.release(1);
    });

    assert!(!handle.is_running());
    assert!(!handle.request_drain());
    let report = reports.try_recv().unwrap();
    assert_eq!(report.outcome, completed(1, 0, 0));
    assert!(reports.try_recv().is_err());
    assert!(store.outbox.list_unsynced().await.unwrap().is_empty());
    assert_eq!(remote.call_count(), 1);
}
