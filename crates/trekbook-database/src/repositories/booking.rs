//! Booking repository implementation.

use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use trekbook_core::error::{AppError, ErrorKind};
use trekbook_core::result::AppResult;
use trekbook_core::types::pagination::{PageRequest, PageResponse};
use trekbook_entity::booking::model::{Booking, NewBooking};
use trekbook_entity::booking::participant::{NewParticipant, Participant};
use trekbook_entity::booking::status::{BookingStatus, CancellationReason, PaymentStatus};

/// A booking whose stored participant records fall short of its
/// participant count. Produced by the repair sweep query.
#[derive(Debug, Clone, FromRow)]
pub struct ParticipantShortfall {
    /// The affected booking.
    pub booking_id: Uuid,
    /// Participants the booking covers.
    pub expected: i32,
    /// Participant records actually stored.
    pub actual: i64,
}

/// Repository for booking CRUD and query operations.
#[derive(Debug, Clone)]
pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    /// Create a new booking repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a booking by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Booking>> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find booking", e))
    }

    /// List all bookings with pagination (admin view), newest first.
    pub async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<Booking>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count bookings", e)
            })?;

        let bookings = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list bookings", e))?;

        Ok(PageResponse::new(
            bookings,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// List a user's bookings, newest first.
    pub async fn find_by_user(&self, user_id: Uuid) -> AppResult<Vec<Booking>> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list user bookings", e))
    }

    /// Insert a new booking in `pending_approval`.
    ///
    /// The insert carries no discount; `admission_seq` is assigned by the
    /// database sequence, giving concurrent inserts a total order.
    pub async fn insert_pending(&self, data: &NewBooking) -> AppResult<Booking> {
        sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings \
             (user_id, slot_id, participants, contact_name, contact_email, contact_phone, \
              base_amount, gst_amount, total_amount) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $7 + $8) RETURNING *",
        )
        .bind(data.user_id)
        .bind(data.slot_id)
        .bind(data.participants)
        .bind(&data.contact_name)
        .bind(&data.contact_email)
        .bind(&data.contact_phone)
        .bind(data.base_amount)
        .bind(data.gst_amount)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert booking", e))
    }

    /// Insert a single participant record for a booking.
    pub async fn insert_participant(
        &self,
        booking_id: Uuid,
        data: &NewParticipant,
    ) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO booking_participants \
             (booking_id, full_name, date_of_birth, emergency_contact, medical_notes, waiver_accepted) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(booking_id)
        .bind(&data.full_name)
        .bind(data.date_of_birth)
        .bind(&data.emergency_contact)
        .bind(&data.medical_notes)
        .bind(data.waiver_accepted)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to insert participant", e)
        })?;
        Ok(())
    }

    /// List the participant records of a booking.
    pub async fn participants_for(&self, booking_id: Uuid) -> AppResult<Vec<Participant>> {
        sqlx::query_as::<_, Participant>(
            "SELECT * FROM booking_participants WHERE booking_id = $1 ORDER BY created_at ASC",
        )
        .bind(booking_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list participants", e)
        })
    }

    /// Transition a booking's lifecycle status with a compare-and-swap on
    /// the current status. Returns `None` if the booking was not in the
    /// expected status (concurrent decision).
    pub async fn transition(
        &self,
        id: Uuid,
        from: BookingStatus,
        to: BookingStatus,
        decided_by: Option<Uuid>,
        reason: Option<CancellationReason>,
    ) -> AppResult<Option<Booking>> {
        sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status = $2, cancellation_reason = $3, decided_by = $4, \
             decided_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND status = $5 RETURNING *",
        )
        .bind(id)
        .bind(to)
        .bind(reason)
        .bind(decided_by)
        .bind(from)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to transition booking", e)
        })
    }

    /// Move the payment track with a compare-and-swap on the current
    /// payment status. Returns `None` on a lost race.
    pub async fn transition_payment(
        &self,
        id: Uuid,
        from: PaymentStatus,
        to: PaymentStatus,
    ) -> AppResult<Option<Booking>> {
        sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET payment_status = $2, updated_at = NOW() \
             WHERE id = $1 AND payment_status = $3 RETURNING *",
        )
        .bind(id)
        .bind(to)
        .bind(from)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update payment status", e)
        })
    }

    /// Find seat-holding bookings whose stored participant records fall
    /// short of their participant count (repair sweep input).
    pub async fn find_participant_shortfalls(&self) -> AppResult<Vec<ParticipantShortfall>> {
        sqlx::query_as::<_, ParticipantShortfall>(
            "SELECT b.id AS booking_id, b.participants AS expected, COUNT(p.id) AS actual \
             FROM bookings b \
             LEFT JOIN booking_participants p ON p.booking_id = b.id \
             WHERE b.status IN ('pending_approval', 'confirmed') \
             GROUP BY b.id, b.participants \
             HAVING COUNT(p.id) < b.participants",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find participant shortfalls", e)
        })
    }
}
