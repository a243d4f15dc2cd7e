//! Admin booking lifecycle: approval, rejection, cancellation,
//! completion, and the payment track.
//!
//! Every cancellation reconciles the owning slot so the freed seats are
//! visible before the response returns.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use trekbook_core::error::AppError;
use trekbook_core::events::{BookingEvent, DomainEvent};
use trekbook_core::result::AppResult;
use trekbook_core::traits::NotificationSink;
use trekbook_database::store::ReservationStore;
use trekbook_entity::booking::model::Booking;
use trekbook_entity::booking::status::{BookingStatus, CancellationReason, PaymentStatus};

use crate::context::RequestContext;

/// Admin decisions over the booking lifecycle.
pub struct BookingAdminService {
    /// Reservation store.
    store: Arc<dyn ReservationStore>,
    /// Lifecycle event sink.
    sink: Arc<dyn NotificationSink>,
}

impl BookingAdminService {
    /// Creates a new booking admin service.
    pub fn new(store: Arc<dyn ReservationStore>, sink: Arc<dyn NotificationSink>) -> Self {
        Self { store, sink }
    }

    /// Confirm a pending booking.
    pub async fn approve(&self, ctx: &RequestContext, booking_id: Uuid) -> AppResult<Booking> {
        ctx.require_admin()?;

        let booking = self
            .decide(ctx, booking_id, BookingStatus::Confirmed, None)
            .await?;

        self.sink
            .notify(&DomainEvent::booking(
                Some(ctx.user_id),
                BookingEvent::Confirmed {
                    booking_id: booking.id,
                    slot_id: booking.slot_id,
                },
            ))
            .await;

        info!(%booking_id, admin = %ctx.user_id, "Booking confirmed");
        Ok(booking)
    }

    /// Reject a pending booking, freeing its seats.
    pub async fn reject(&self, ctx: &RequestContext, booking_id: Uuid) -> AppResult<Booking> {
        ctx.require_admin()?;
        self.cancel_with_reason(ctx, booking_id, CancellationReason::AdminRejected)
            .await
    }

    /// Cancel a pending or confirmed booking, freeing its seats.
    pub async fn cancel(&self, ctx: &RequestContext, booking_id: Uuid) -> AppResult<Booking> {
        ctx.require_admin()?;
        self.cancel_with_reason(ctx, booking_id, CancellationReason::AdminCancelled)
            .await
    }

    /// Mark a confirmed booking completed (the trek departed).
    pub async fn complete(&self, ctx: &RequestContext, booking_id: Uuid) -> AppResult<Booking> {
        ctx.require_admin()?;

        let booking = self
            .decide(ctx, booking_id, BookingStatus::Completed, None)
            .await?;

        // Completed bookings no longer hold seats; keep the tally honest.
        self.store.reconcile(booking.slot_id.into()).await?;

        self.sink
            .notify(&DomainEvent::booking(
                Some(ctx.user_id),
                BookingEvent::Completed {
                    booking_id: booking.id,
                },
            ))
            .await;

        info!(%booking_id, "Booking completed");
        Ok(booking)
    }

    /// Move the payment track (gateway callbacks arrive through the
    /// admin surface).
    pub async fn set_payment_status(
        &self,
        ctx: &RequestContext,
        booking_id: Uuid,
        next: PaymentStatus,
    ) -> AppResult<Booking> {
        ctx.require_admin()?;

        let booking = self
            .store
            .find_booking(booking_id.into())
            .await?
            .ok_or_else(|| AppError::not_found(format!("Booking {booking_id} not found")))?;

        if !booking.payment_status.can_transition_to(next) {
            return Err(AppError::conflict(format!(
                "Payment cannot move from {} to {}",
                booking.payment_status, next
            )));
        }

        let updated = self
            .store
            .transition_payment(booking_id.into(), booking.payment_status, next)
            .await?
            .ok_or_else(|| {
                AppError::conflict("Payment status changed concurrently; retry the update")
            })?;

        self.sink
            .notify(&DomainEvent::booking(
                Some(ctx.user_id),
                BookingEvent::PaymentUpdated {
                    booking_id: updated.id,
                    payment_status: next.to_string(),
                },
            ))
            .await;

        Ok(updated)
    }

    async fn cancel_with_reason(
        &self,
        ctx: &RequestContext,
        booking_id: Uuid,
        reason: CancellationReason,
    ) -> AppResult<Booking> {
        let booking = self
            .decide(ctx, booking_id, BookingStatus::Cancelled, Some(reason))
            .await?;

        // Free the seats via a full recount, never a decrement.
        self.store.reconcile(booking.slot_id.into()).await?;

        self.sink
            .notify(&DomainEvent::booking(
                Some(ctx.user_id),
                BookingEvent::Cancelled {
                    booking_id: booking.id,
                    slot_id: booking.slot_id,
                    reason: reason.to_string(),
                },
            ))
            .await;

        info!(%booking_id, %reason, "Booking cancelled");
        Ok(booking)
    }

    /// Validate and perform a lifecycle transition with a CAS on the
    /// current status.
    async fn decide(
        &self,
        ctx: &RequestContext,
        booking_id: Uuid,
        to: BookingStatus,
        reason: Option<CancellationReason>,
    ) -> AppResult<Booking> {
        let booking = self
            .store
            .find_booking(booking_id.into())
            .await?
            .ok_or_else(|| AppError::not_found(format!("Booking {booking_id} not found")))?;

        if !booking.status.can_transition_to(to) {
            return Err(AppError::conflict(format!(
                "Booking cannot move from {} to {}",
                booking.status, to
            )));
        }

        self.store
            .transition(
                booking_id.into(),
                booking.status,
                to,
                Some(ctx.user_id.into()),
                reason,
            )
            .await?
            .ok_or_else(|| AppError::conflict("Booking was decided concurrently; reload it"))
    }
}
