//! # Booking Snapshot Collection
//!
//! Storage operations for cached `BookingSnapshot`s. Writes are upserts keyed
//! by booking id; the full-collection swap runs in one transaction so a
//! reader sees either the old set or the new set, never a mix.

use crate::frontdesk::local_db::{LocalDatabase, Result, StorageError};
use crate::shared::booking::{BookingSnapshot, BookingStatus};
use chrono::NaiveDate;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite};

const SELECT_BOOKING: &str = "SELECT id, guest_name, guest_phone, room_name, check_in_date,
        check_out_date, status, hotel_id, cached_at
     FROM bookings";

impl LocalDatabase {
    /// Insert or overwrite a snapshot
    pub async fn put_booking(&self, booking: &BookingSnapshot) -> Result<()> {
        upsert_booking(&self.pool, booking).await
    }

    pub async fn get_booking(&self, booking_id: &str) -> Result<Option<BookingSnapshot>> {
        let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_BOOKING))
            .bind(booking_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(booking_from_row).transpose()
    }

    /// All snapshots, ordered by check-in date
    pub async fn all_bookings(&self) -> Result<Vec<BookingSnapshot>> {
        let rows = sqlx::query(&format!("{} ORDER BY check_in_date ASC, id ASC", SELECT_BOOKING))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(booking_from_row).collect()
    }

    /// Returns whether a row was removed
    pub async fn delete_booking(&self, booking_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = ?")
            .bind(booking_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Atomically swap the whole snapshot collection
    pub async fn replace_bookings(&self, bookings: &[BookingSnapshot]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM bookings").execute(&mut *tx).await?;
        for booking in bookings {
            upsert_booking(&mut *tx, booking).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn clear_bookings(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM bookings")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn bookings_by_status(&self, status: BookingStatus) -> Result<Vec<BookingSnapshot>> {
        let rows = sqlx::query(&format!(
            "{} WHERE status = ? ORDER BY check_in_date ASC, id ASC",
            SELECT_BOOKING
        ))
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(booking_from_row).collect()
    }

    pub async fn bookings_checking_in_on(&self, date: NaiveDate) -> Result<Vec<BookingSnapshot>> {
        let rows = sqlx::query(&format!("{} WHERE check_in_date = ? ORDER BY id ASC", SELECT_BOOKING))
            .bind(date)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(booking_from_row).collect()
    }

    /// Cache timestamp of the oldest snapshot, `None` when empty
    pub async fn oldest_cached_at(&self) -> Result<Option<i64>> {
        let (oldest,): (Option<i64>,) = sqlx::query_as("SELECT MIN(cached_at) FROM bookings")
            .fetch_one(&self.pool)
            .await?;
        Ok(oldest)
    }
}

pub(crate) async fn upsert_booking<'e, E>(executor: E, booking: &BookingSnapshot) -> Result<()>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO bookings (id, guest_name, guest_phone, room_name, check_in_date,
            check_out_date, status, hotel_id, cached_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(id) DO UPDATE SET
            guest_name = excluded.guest_name,
            guest_phone = excluded.guest_phone,
            room_name = excluded.room_name,
            check_in_date = excluded.check_in_date,
            check_out_date = excluded.check_out_date,
            status = excluded.status,
            hotel_id = excluded.hotel_id,
            cached_at = excluded.cached_at",
    )
    .bind(&booking.id)
    .bind(&booking.guest_name)
    .bind(&booking.guest_phone)
    .bind(&booking.room_name)
    .bind(booking.check_in_date)
    .bind(booking.check_out_date)
    .bind(booking.status.as_str())
    .bind(&booking.hotel_id)
    .bind(booking.cached_at)
    .execute(executor)
    .await?;
    Ok(())
}

/// Patch only the status column; returns whether a snapshot existed
pub(crate) async fn set_booking_status<'e, E>(
    executor: E,
    booking_id: &str,
    status: BookingStatus,
) -> Result<bool>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("UPDATE bookings SET status = ? WHERE id = ?")
        .bind(status.as_str())
        .bind(booking_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}

fn booking_from_row(row: &SqliteRow) -> Result<BookingSnapshot> {
    let status: String = row.try_get("status")?;

    Ok(BookingSnapshot {
        id: row.try_get("id")?,
        guest_name: row.try_get("guest_name")?,
        guest_phone: row.try_get("guest_phone")?,
        room_name: row.try_get("room_name")?,
        check_in_date: row.try_get("check_in_date")?,
        check_out_date: row.try_get("check_out_date")?,
        status: status
            .parse()
            .map_err(|e| StorageError::corrupt("status", e))?,
        hotel_id: row.try_get("hotel_id")?,
        cached_at: row.try_get("cached_at")?,
    })
}
