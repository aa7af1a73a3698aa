//! # Local Database Module
//!
//! Crash-safe local storage for the front-desk client, backed by SQLite.
//! Holds two collections:
//!
//! - **bookings**: cached `BookingSnapshot`s, indexed by check-in date and status
//! - **pending_actions**: the outbox of unconfirmed check-in/check-out intents,
//!   indexed by the synced flag
//!
//! ## Key Components
//!
//! - `LocalDatabase`: connection pool, schema setup and lifecycle
//! - `schema.rs`: schema version constants and migration helpers
//! - `bookings.rs`: snapshot collection operations
//! - `pending_actions.rs`: outbox collection operations
//!
//! The handle is constructed explicitly and passed to the components that
//! need it. There is no global instance; tests open a fresh in-memory store
//! each time.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use frontdesk_sync::frontdesk::local_db::LocalDatabase;
//!
//! # async fn example() -> Result<(), frontdesk_sync::frontdesk::local_db::StorageError> {
//! let db = LocalDatabase::open("/var/lib/frontdesk/local.db").await?;
//! let bookings = db.all_bookings().await?;
//! db.close().await;
//! # Ok(())
//! # }
//! ```

pub mod schema;
pub mod bookings;
pub mod pending_actions;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::Path;
use thiserror::Error;

/// Local store failures
///
/// Any of these means the store itself is unusable for the current
/// operation. They are never retried by the sync engine.
#[derive(Debug, Error)]
pub enum StorageError {
    /// SQLite or pool failure (including use after `close`)
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The data directory could not be prepared
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored value does not decode into the data model
    #[error("corrupt value in column '{column}': {message}")]
    Corrupt {
        column: &'static str,
        message: String,
    },
}

impl StorageError {
    pub(crate) fn corrupt(column: &'static str, message: impl ToString) -> Self {
        Self::Corrupt {
            column,
            message: message.to_string(),
        }
    }
}

/// Result type for local database operations
pub type Result<T> = std::result::Result<T, StorageError>;

/// Local database connection manager
#[derive(Debug, Clone)]
pub struct LocalDatabase {
    pool: SqlitePool,
}

impl LocalDatabase {
    /// Open or create a file-backed store
    ///
    /// Creates the parent directory and the file if missing, enables WAL and
    /// applies the schema.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .pragma("cache_size", "1000")
            .pragma("temp_store", "MEMORY");

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.init_schema().await?;

        tracing::info!(path = %path.display(), "Opened local store");
        Ok(db)
    }

    /// Open a private in-memory store
    ///
    /// Uses a single, never-recycled connection so the data lives as long as
    /// the handle.
    pub async fn open_in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        let db = Self { pool };
        db.init_schema().await?;
        Ok(db)
    }

    /// Close the store; later operations fail with `StorageError::Database`
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Closed local store");
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }

    /// Get connection pool reference
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize database schema
    async fn init_schema(&self) -> Result<()> {
        sqlx::raw_sql(include_str!("schema.sql"))
            .execute(&self.pool)
            .await?;

        self.run_migrations().await?;
        Ok(())
    }

    /// Run database migrations
    async fn run_migrations(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        let (current_version,): (i32,) =
            sqlx::query_as("SELECT COALESCE(MAX(version), 0) FROM schema_migrations")
                .fetch_one(&self.pool)
                .await?;
        if !schema::needs_migration(current_version) {
            return Ok(());
        }

        for version in schema::get_pending_migrations(current_version) {
            sqlx::query("INSERT INTO schema_migrations (version, applied_at) VALUES (?, ?)")
                .bind(version)
                .bind(chrono::Utc::now().to_rfc3339())
                .execute(&self.pool)
                .await?;
            tracing::debug!(version, "Applied local schema migration");
        }

        Ok(())
    }

    /// Current schema version recorded in the store
    pub async fn schema_version(&self) -> Result<i32> {
        let (version,): (i32,) =
            sqlx::query_as("SELECT COALESCE(MAX(version), 0) FROM schema_migrations")
                .fetch_one(&self.pool)
                .await?;
        Ok(version)
    }

    /// Get database statistics
    pub async fn stats(&self) -> Result<DatabaseStats> {
        let (booking_count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM bookings")
            .fetch_one(&self.pool)
            .await?;

        let (unsynced_actions,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM pending_actions WHERE synced = 0")
                .fetch_one(&self.pool)
                .await?;

        let (synced_actions,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM pending_actions WHERE synced = 1")
                .fetch_one(&self.pool)
                .await?;

        Ok(DatabaseStats {
            booking_count: booking_count as u64,
            unsynced_actions: unsynced_actions as u64,
            synced_actions: synced_actions as u64,
        })
    }
}

/// Database statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseStats {
    /// Cached booking snapshots
    pub booking_count: u64,
    /// Outbox entries not yet confirmed
    pub unsynced_actions: u64,
    /// Confirmed entries still inside the retention window
    pub synced_actions: u64,
}
