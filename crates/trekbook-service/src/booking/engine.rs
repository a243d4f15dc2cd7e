//! The reservation engine — booking admission under contention.
//!
//! Admission never trusts a cached seat count. The booking is inserted
//! first (inserts cannot conflict), then the store's admit step decides
//! its fate under a short slot-row lock, ordered by `admission_seq`. A
//! booking that does not fit is cancelled in place before the caller
//! gets its answer, so the response is always definitive.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use trekbook_core::error::{AppError, ErrorKind};
use trekbook_core::events::{BookingEvent, DomainEvent};
use trekbook_core::result::AppResult;
use trekbook_core::traits::{NotificationSink, PriceLookup};
use trekbook_database::store::{AdmissionOutcome, ReservationStore};
use trekbook_entity::booking::model::{Booking, NewBooking};
use trekbook_entity::booking::participant::NewParticipant;
use trekbook_entity::booking::pricing::PricingQuote;
use trekbook_entity::booking::status::{BookingStatus, CancellationReason};

use crate::context::RequestContext;
use crate::voucher::resolver::VoucherResolver;

/// A booking creation request, validated before any store access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    /// The trek to book.
    pub trek_slug: String,
    /// Departure date of the target slot.
    pub departure_date: NaiveDate,
    /// Number of participants (1–20).
    pub participants: i32,
    /// Contact name.
    pub contact_name: String,
    /// Contact email.
    pub contact_email: String,
    /// Contact phone.
    pub contact_phone: Option<String>,
    /// Optional voucher code.
    pub voucher_code: Option<String>,
    /// Participant details (best-effort sub-records).
    #[serde(default)]
    pub participant_details: Vec<NewParticipant>,
}

impl CreateBookingRequest {
    fn validate(&self) -> AppResult<()> {
        if !Booking::valid_participants(self.participants) {
            return Err(AppError::validation(format!(
                "Participants must be between 1 and 20, got {}",
                self.participants
            )));
        }
        if self.trek_slug.trim().is_empty() {
            return Err(AppError::validation("Trek slug is required"));
        }
        if self.contact_name.trim().is_empty() {
            return Err(AppError::validation("Contact name is required"));
        }
        if !self.contact_email.contains('@') {
            return Err(AppError::validation("A valid contact email is required"));
        }
        Ok(())
    }
}

/// The definitive answer to a creation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfirmation {
    /// The created booking.
    pub booking_id: Uuid,
    /// Lifecycle status at creation (always pending approval).
    pub status: BookingStatus,
    /// Trek price × participants.
    pub base_amount: i64,
    /// 5% GST on the base amount.
    pub gst_amount: i64,
    /// Voucher discount applied.
    pub discount_amount: i64,
    /// Amount payable.
    pub total_amount: i64,
    /// Whether the supplied voucher was applied.
    pub voucher_applied: bool,
    /// Why the voucher was dropped, when it was supplied but rejected.
    pub voucher_rejection: Option<String>,
}

/// Orchestrates booking creation against the reservation store.
pub struct ReservationEngine {
    /// Reservation store.
    store: Arc<dyn ReservationStore>,
    /// Trek price collaborator.
    prices: Arc<dyn PriceLookup>,
    /// Voucher resolver.
    vouchers: Arc<VoucherResolver>,
    /// Lifecycle event sink.
    sink: Arc<dyn NotificationSink>,
}

impl ReservationEngine {
    /// Creates a new reservation engine.
    pub fn new(
        store: Arc<dyn ReservationStore>,
        prices: Arc<dyn PriceLookup>,
        vouchers: Arc<VoucherResolver>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            store,
            prices,
            vouchers,
            sink,
        }
    }

    /// Create a booking for the authenticated caller.
    ///
    /// Returns the booking id and final amounts, or a definitive failure:
    /// `SlotUnavailable`, `CapacityExceeded`, `Validation`, or
    /// `VoucherConsumed`. An invalid voucher does not fail the booking;
    /// the discount is dropped and the rejection reason is reported in
    /// the confirmation.
    pub async fn create_booking(
        &self,
        ctx: &RequestContext,
        req: CreateBookingRequest,
    ) -> AppResult<BookingConfirmation> {
        req.validate()?;

        let slot = self
            .store
            .find_open_slot(&req.trek_slug, req.departure_date)
            .await?
            .ok_or_else(|| {
                AppError::slot_unavailable(format!(
                    "No open departure for {} on {}",
                    req.trek_slug, req.departure_date
                ))
            })?;

        let price = self
            .prices
            .base_price(&req.trek_slug)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Trek {} is not bookable", req.trek_slug))
            })?;

        let quote = PricingQuote::for_base(price * i64::from(req.participants));

        let booking = self
            .store
            .insert_pending(&NewBooking {
                user_id: ctx.user_id,
                slot_id: slot.id,
                participants: req.participants,
                contact_name: req.contact_name.clone(),
                contact_email: req.contact_email.clone(),
                contact_phone: req.contact_phone.clone(),
                base_amount: quote.base_amount,
                gst_amount: quote.gst_amount,
            })
            .await?;

        match self.store.admit(slot.id.into(), booking.id.into()).await? {
            AdmissionOutcome::Admitted { booked } => {
                info!(
                    booking_id = %booking.id,
                    slot_id = %slot.id,
                    booked,
                    "Booking admitted"
                );
            }
            AdmissionOutcome::Rejected { booked, capacity } => {
                return Err(AppError::capacity_exceeded(format!(
                    "Only {} of {} seats remain on this departure",
                    (capacity - booked).max(0),
                    capacity
                )));
            }
            AdmissionOutcome::SlotClosed => {
                return Err(AppError::slot_unavailable(
                    "This departure closed while the booking was being processed",
                ));
            }
        }

        let (quote, voucher_applied, voucher_rejection) = match &req.voucher_code {
            Some(code) => {
                self.apply_voucher(ctx, &booking, code, quote, slot.id)
                    .await?
            }
            None => (quote, false, None),
        };

        let written = self
            .store
            .insert_participants(booking.id.into(), &req.participant_details)
            .await?;
        if written < req.participant_details.len() {
            warn!(
                booking_id = %booking.id,
                written,
                expected = req.participant_details.len(),
                "Participant records incomplete; repair sweep will flag"
            );
        }

        self.sink
            .notify(&DomainEvent::booking(
                Some(ctx.user_id),
                BookingEvent::Created {
                    booking_id: booking.id,
                    slot_id: slot.id,
                    participants: req.participants,
                    total_amount: quote.total_amount,
                    voucher_applied,
                },
            ))
            .await;

        Ok(BookingConfirmation {
            booking_id: booking.id,
            status: BookingStatus::PendingApproval,
            base_amount: quote.base_amount,
            gst_amount: quote.gst_amount,
            discount_amount: quote.discount_amount,
            total_amount: quote.total_amount,
            voucher_applied,
            voucher_rejection,
        })
    }

    /// Apply a voucher to an admitted booking.
    ///
    /// A rejected voucher degrades to no discount. A voucher lost to a
    /// concurrent claim hard-fails: the booking is cancelled, the slot
    /// reconciled, and the error surfaced — the caller never pays full
    /// price it did not agree to.
    async fn apply_voucher(
        &self,
        ctx: &RequestContext,
        booking: &Booking,
        code: &str,
        quote: PricingQuote,
        slot_id: Uuid,
    ) -> AppResult<(PricingQuote, bool, Option<String>)> {
        match self
            .vouchers
            .apply(code, quote.payable(), ctx.user_id, booking.id)
            .await
        {
            Ok(application) => Ok((
                quote.with_discount(application.discount_amount),
                true,
                None,
            )),
            Err(e) if e.kind == ErrorKind::VoucherInvalid => {
                warn!(
                    booking_id = %booking.id,
                    code,
                    reason = %e.message,
                    "Voucher rejected; booking proceeds without discount"
                );
                Ok((quote, false, Some(e.message)))
            }
            Err(e) if e.kind == ErrorKind::VoucherConsumed => {
                self.store
                    .cancel_pending(booking.id.into(), CancellationReason::VoucherConflict)
                    .await?;
                self.store.reconcile(slot_id.into()).await?;
                Err(e)
            }
            Err(e) => Err(e),
        }
    }
}
