//! Slot repository implementation.
//!
//! Note: the `booked` column is never written here. Recomputing it from
//! the booking set is the job of the reservation store's reconcile step,
//! which is the single writer of that column.

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use trekbook_core::error::{AppError, ErrorKind};
use trekbook_core::result::AppResult;
use trekbook_entity::slot::model::{NewSlot, Slot};

/// Repository for slot CRUD and query operations.
#[derive(Debug, Clone)]
pub struct SlotRepository {
    pool: PgPool,
}

impl SlotRepository {
    /// Create a new slot repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a slot by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Slot>> {
        sqlx::query_as::<_, Slot>("SELECT * FROM slots WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find slot", e))
    }

    /// Find a slot by its (trek, departure date) composite key.
    pub async fn find_by_trek_date(
        &self,
        trek_slug: &str,
        departure_date: NaiveDate,
    ) -> AppResult<Option<Slot>> {
        sqlx::query_as::<_, Slot>(
            "SELECT * FROM slots WHERE trek_slug = $1 AND departure_date = $2",
        )
        .bind(trek_slug)
        .bind(departure_date)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find slot by trek/date", e)
        })
    }

    /// List open slots for a trek departing on or after the given date.
    pub async fn list_open_by_trek(
        &self,
        trek_slug: &str,
        from_date: NaiveDate,
    ) -> AppResult<Vec<Slot>> {
        sqlx::query_as::<_, Slot>(
            "SELECT * FROM slots WHERE trek_slug = $1 AND departure_date >= $2 \
             AND status = 'open' ORDER BY departure_date ASC",
        )
        .bind(trek_slug)
        .bind(from_date)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list open slots", e))
    }

    /// Schedule a new slot.
    pub async fn create(&self, data: &NewSlot) -> AppResult<Slot> {
        sqlx::query_as::<_, Slot>(
            "INSERT INTO slots (trek_slug, departure_date, capacity) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&data.trek_slug)
        .bind(data.departure_date)
        .bind(data.capacity)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create slot", e))
    }

    /// Close a slot to new bookings.
    pub async fn close(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE slots SET status = 'closed', updated_at = NOW() \
             WHERE id = $1 AND status != 'closed'",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to close slot", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Open slot {id} not found")));
        }
        Ok(())
    }

    /// List slot IDs eligible for the reconcile sweep (not closed).
    pub async fn list_reconcilable_ids(&self) -> AppResult<Vec<Uuid>> {
        sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM slots WHERE status != 'closed' ORDER BY departure_date ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list reconcilable slots", e)
        })
    }

    /// Close all slots whose departure date has passed. Returns the
    /// number of slots archived.
    pub async fn close_departed(&self, today: NaiveDate) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE slots SET status = 'closed', updated_at = NOW() \
             WHERE departure_date < $1 AND status != 'closed'",
        )
        .bind(today)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to archive departed slots", e)
        })?;

        Ok(result.rows_affected())
    }
}
