/**
 * Front Desk Sync Agent Entry Point
 *
 * Opens the local store, attaches the trigger coordinator to a reachability
 * probe against the booking server, and drains the outbox until Ctrl-C.
 */
use frontdesk_sync::frontdesk::{
    CacheManager, Config, DrainOutcome, HttpRemoteAuthority, LocalDatabase, NetworkMonitor,
    OutboxQueue, SyncEngine, TriggerCoordinator,
};
use frontdesk_sync::shared::SystemClock;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .init();

    let config = Config::from_env()?;
    let database_path = config.database_path();
    tracing::info!(path = %database_path.display(), "Opening local store");
    let db = LocalDatabase::open(&database_path).await?;

    let stats = db.stats().await?;
    tracing::info!(
        bookings = stats.booking_count,
        unsynced = stats.unsynced_actions,
        "Local store ready"
    );

    let clock = Arc::new(SystemClock);
    let cache = CacheManager::new(db.clone(), clock.clone()).configured(config.app());
    if cache.is_stale().await? {
        tracing::info!(
            stale_after = ?config.app().stale_after,
            "Booking cache is stale; the front-desk UI should refetch"
        );
    }

    let outbox = OutboxQueue::new(db.clone(), clock.clone());
    let remote = Arc::new(HttpRemoteAuthority::new(config.clone())?);
    let engine = Arc::new(SyncEngine::new(outbox, remote, clock).configured(config.app()));

    let monitor = Arc::new(NetworkMonitor::from_config(config.app()));
    let mut handle = TriggerCoordinator::attach(engine, monitor.clone());
    let mut reports = handle.subscribe();

    monitor.spawn_probe(
        config.server_url().to_string(),
        config.app().probe_interval,
        config.app().request_timeout,
    )?;
    tracing::info!(server = %config.server_url(), "Sync agent started");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down");
                break;
            }
            report = reports.recv() => match report {
                Ok(report) => match report.outcome {
                    DrainOutcome::Completed(result) if result.failed > 0 => {
                        tracing::warn!(
                            trigger = ?report.trigger,
                            failed = result.failed,
                            "Some actions exhausted their retries"
                        );
                    }
                    DrainOutcome::Completed(_) => {}
                    DrainOutcome::Faulted(error) => {
                        tracing::error!(trigger = ?report.trigger, %error, "Local store fault during drain");
                    }
                },
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Missed drain reports");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    handle.shutdown().await;
    monitor.stop();
    db.close().await;
    Ok(())
}
