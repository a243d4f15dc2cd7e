//! PostgreSQL-backed reservation store.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::warn;

use trekbook_core::error::{AppError, ErrorKind};
use trekbook_core::result::AppResult;
use trekbook_core::types::id::{BookingId, SlotId, UserId, VoucherId};
use trekbook_entity::booking::model::{Booking, NewBooking};
use trekbook_entity::booking::participant::NewParticipant;
use trekbook_entity::booking::status::{BookingStatus, CancellationReason, PaymentStatus};
use trekbook_entity::slot::model::Slot;
use trekbook_entity::slot::status::SlotStatus;
use trekbook_entity::voucher::model::{Voucher, VoucherKind};

use crate::repositories::{BookingRepository, SlotRepository, VoucherRepository};

use super::{AdmissionOutcome, ReconcileReport, ReservationStore};

/// Production reservation store backed by PostgreSQL.
///
/// Plain lookups and inserts delegate to the repositories; the
/// admission, reconciliation, and discount steps run their own
/// transactions because their correctness depends on what commits
/// together.
#[derive(Debug, Clone)]
pub struct PgReservationStore {
    pool: PgPool,
    slots: SlotRepository,
    bookings: BookingRepository,
    vouchers: VoucherRepository,
}

impl PgReservationStore {
    /// Create a new store over the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            slots: SlotRepository::new(pool.clone()),
            bookings: BookingRepository::new(pool.clone()),
            vouchers: VoucherRepository::new(pool.clone()),
            pool,
        }
    }

    /// Lock the slot row and return (capacity, status), or `None` if the
    /// slot does not exist. The lock is released at transaction end.
    async fn lock_slot(
        tx: &mut Transaction<'_, Postgres>,
        slot_id: SlotId,
    ) -> AppResult<Option<(i32, SlotStatus)>> {
        sqlx::query_as::<_, (i32, SlotStatus)>(
            "SELECT capacity, status FROM slots WHERE id = $1 FOR UPDATE",
        )
        .bind(slot_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to lock slot", e))
    }

    /// Recount seats held by non-cancelled bookings against the slot.
    async fn recount(tx: &mut Transaction<'_, Postgres>, slot_id: SlotId) -> AppResult<i32> {
        let booked: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(participants), 0) FROM bookings \
             WHERE slot_id = $1 AND status IN ('pending_approval', 'confirmed')",
        )
        .bind(slot_id)
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to recount seats", e))?;
        Ok(booked as i32)
    }

    /// Write the recounted tally and derived status to the slot row.
    async fn write_tally(
        tx: &mut Transaction<'_, Postgres>,
        slot_id: SlotId,
        booked: i32,
        capacity: i32,
        current: SlotStatus,
    ) -> AppResult<SlotStatus> {
        let status = if current == SlotStatus::Closed {
            SlotStatus::Closed
        } else {
            SlotStatus::derive(booked, capacity)
        };
        sqlx::query("UPDATE slots SET booked = $2, status = $3, updated_at = NOW() WHERE id = $1")
            .bind(slot_id)
            .bind(booked)
            .bind(status)
            .execute(&mut **tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to write slot tally", e)
            })?;
        Ok(status)
    }

    /// Cancel a booking in place inside the admission transaction.
    async fn cancel_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        booking_id: BookingId,
        reason: CancellationReason,
    ) -> AppResult<()> {
        sqlx::query(
            "UPDATE bookings SET status = 'cancelled', cancellation_reason = $2, \
             updated_at = NOW() WHERE id = $1 AND status = 'pending_approval'",
        )
        .bind(booking_id)
        .bind(reason)
        .execute(&mut **tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to cancel booking", e))?;
        Ok(())
    }

    fn begin_err(e: sqlx::Error) -> AppError {
        AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
    }

    fn commit_err(e: sqlx::Error) -> AppError {
        AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
    }
}

#[async_trait]
impl ReservationStore for PgReservationStore {
    async fn find_open_slot(
        &self,
        trek_slug: &str,
        departure_date: NaiveDate,
    ) -> AppResult<Option<Slot>> {
        let slot = self.slots.find_by_trek_date(trek_slug, departure_date).await?;
        Ok(slot.filter(Slot::is_open))
    }

    async fn insert_pending(&self, booking: &NewBooking) -> AppResult<Booking> {
        self.bookings.insert_pending(booking).await
    }

    async fn admit(
        &self,
        slot_id: SlotId,
        booking_id: BookingId,
    ) -> AppResult<AdmissionOutcome> {
        let mut tx = self.pool.begin().await.map_err(Self::begin_err)?;

        let Some((capacity, status)) = Self::lock_slot(&mut tx, slot_id).await? else {
            return Err(AppError::not_found(format!("Slot {slot_id} not found")));
        };

        if status == SlotStatus::Closed {
            Self::cancel_in_tx(&mut tx, booking_id, CancellationReason::SlotClosed).await?;
            let booked = Self::recount(&mut tx, slot_id).await?;
            Self::write_tally(&mut tx, slot_id, booked, capacity, status).await?;
            tx.commit().await.map_err(Self::commit_err)?;
            return Ok(AdmissionOutcome::SlotClosed);
        }

        // Seats held by this booking and every booking admitted before it
        // (admission_seq orders concurrent inserts).
        let prefix: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(participants), 0) FROM bookings \
             WHERE slot_id = $1 AND status IN ('pending_approval', 'confirmed') \
             AND admission_seq <= (SELECT admission_seq FROM bookings WHERE id = $2)",
        )
        .bind(slot_id)
        .bind(booking_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to compute admission prefix", e)
        })?;

        let admitted = prefix <= i64::from(capacity);
        if !admitted {
            Self::cancel_in_tx(&mut tx, booking_id, CancellationReason::CapacityExceeded).await?;
        }

        let booked = Self::recount(&mut tx, slot_id).await?;
        Self::write_tally(&mut tx, slot_id, booked, capacity, status).await?;
        tx.commit().await.map_err(Self::commit_err)?;

        if admitted {
            Ok(AdmissionOutcome::Admitted { booked })
        } else {
            Ok(AdmissionOutcome::Rejected { booked, capacity })
        }
    }

    async fn reconcile(&self, slot_id: SlotId) -> AppResult<ReconcileReport> {
        let mut tx = self.pool.begin().await.map_err(Self::begin_err)?;

        let Some((capacity, status)) = Self::lock_slot(&mut tx, slot_id).await? else {
            return Err(AppError::not_found(format!("Slot {slot_id} not found")));
        };

        let booked = Self::recount(&mut tx, slot_id).await?;
        let status = Self::write_tally(&mut tx, slot_id, booked, capacity, status).await?;
        tx.commit().await.map_err(Self::commit_err)?;

        let capacity_exceeded = booked > capacity;
        if capacity_exceeded {
            warn!(
                %slot_id,
                booked,
                capacity,
                "Reconcile observed more seats than capacity"
            );
        }

        Ok(ReconcileReport {
            slot_id,
            booked,
            capacity,
            status,
            capacity_exceeded,
        })
    }

    async fn cancel_pending(
        &self,
        booking_id: BookingId,
        reason: CancellationReason,
    ) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE bookings SET status = 'cancelled', cancellation_reason = $2, \
             updated_at = NOW() WHERE id = $1 AND status = 'pending_approval'",
        )
        .bind(booking_id)
        .bind(reason)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to cancel booking", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::conflict(format!(
                "Booking {booking_id} is no longer pending"
            )));
        }
        Ok(())
    }

    async fn find_booking(&self, booking_id: BookingId) -> AppResult<Option<Booking>> {
        self.bookings.find_by_id(booking_id.into_uuid()).await
    }

    async fn transition(
        &self,
        booking_id: BookingId,
        from: BookingStatus,
        to: BookingStatus,
        decided_by: Option<UserId>,
        reason: Option<CancellationReason>,
    ) -> AppResult<Option<Booking>> {
        self.bookings
            .transition(
                booking_id.into_uuid(),
                from,
                to,
                decided_by.map(UserId::into_uuid),
                reason,
            )
            .await
    }

    async fn transition_payment(
        &self,
        booking_id: BookingId,
        from: PaymentStatus,
        to: PaymentStatus,
    ) -> AppResult<Option<Booking>> {
        self.bookings
            .transition_payment(booking_id.into_uuid(), from, to)
            .await
    }

    async fn find_voucher(&self, code: &str) -> AppResult<Option<Voucher>> {
        self.vouchers.find_by_code(code).await
    }

    async fn user_redeemed(&self, voucher_id: VoucherId, user_id: UserId) -> AppResult<bool> {
        self.vouchers
            .has_redemption(voucher_id.into_uuid(), user_id.into_uuid())
            .await
    }

    async fn apply_discount(
        &self,
        booking_id: BookingId,
        voucher: &Voucher,
        user_id: UserId,
        discount: i64,
    ) -> AppResult<bool> {
        let mut tx = self.pool.begin().await.map_err(Self::begin_err)?;

        // The claim: a conditional write that exactly one booking can win.
        let claimed = match voucher.kind {
            VoucherKind::SingleUse => {
                let result = sqlx::query(
                    "UPDATE vouchers SET is_used = TRUE, used_by = $2, used_at = NOW() \
                     WHERE id = $1 AND is_used = FALSE",
                )
                .bind(voucher.id)
                .bind(user_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to consume voucher", e)
                })?;
                result.rows_affected() > 0
            }
            VoucherKind::Personal => {
                let result = sqlx::query(
                    "INSERT INTO voucher_redemptions (voucher_id, user_id, booking_id) \
                     VALUES ($1, $2, $3) ON CONFLICT (voucher_id, user_id) DO NOTHING",
                )
                .bind(voucher.id)
                .bind(user_id)
                .bind(booking_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to record redemption", e)
                })?;
                result.rows_affected() > 0
            }
        };

        if !claimed {
            // Dropping the transaction rolls back; the voucher is untouched.
            return Ok(false);
        }

        sqlx::query(
            "UPDATE bookings SET voucher_id = $2, discount_amount = $3, \
             total_amount = base_amount + gst_amount - $3, updated_at = NOW() WHERE id = $1",
        )
        .bind(booking_id)
        .bind(voucher.id)
        .bind(discount)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to write discounted amounts", e)
        })?;

        tx.commit().await.map_err(Self::commit_err)?;
        Ok(true)
    }

    async fn insert_participants(
        &self,
        booking_id: BookingId,
        participants: &[NewParticipant],
    ) -> AppResult<usize> {
        let mut written = 0;
        for participant in participants {
            match self
                .bookings
                .insert_participant(booking_id.into_uuid(), participant)
                .await
            {
                Ok(()) => written += 1,
                Err(e) => {
                    // Non-fatal: the booking's own fields stay
                    // authoritative and the repair sweep flags shortfalls.
                    warn!(
                        %booking_id,
                        participant = %participant.full_name,
                        error = %e,
                        "Failed to write participant record"
                    );
                }
            }
        }
        Ok(written)
    }
}
