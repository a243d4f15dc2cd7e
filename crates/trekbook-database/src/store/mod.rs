//! Reservation store abstraction.
//!
//! The reservation engine runs against this trait. Two implementations
//! are provided:
//! - PostgreSQL-backed ([`postgres::PgReservationStore`]), the production
//!   store; admission and reconciliation run in short transactions
//!   holding a `FOR UPDATE` lock on the slot row.
//! - In-memory ([`memory::InMemoryReservationStore`]), using
//!   `tokio::sync::Mutex`, with identical semantics; used by tests.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::NaiveDate;

use trekbook_core::result::AppResult;
use trekbook_core::types::id::{BookingId, SlotId, UserId, VoucherId};
use trekbook_entity::booking::model::{Booking, NewBooking};
use trekbook_entity::booking::participant::NewParticipant;
use trekbook_entity::booking::status::{BookingStatus, CancellationReason, PaymentStatus};
use trekbook_entity::slot::model::Slot;
use trekbook_entity::slot::status::SlotStatus;
use trekbook_entity::voucher::model::Voucher;

pub use memory::{FixedPriceLookup, InMemoryReservationStore};
pub use postgres::PgReservationStore;

/// Outcome of the post-insert admission decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionOutcome {
    /// The booking fits within capacity; the slot tally was rewritten.
    Admitted {
        /// Seats held after admission.
        booked: i32,
    },
    /// The prefix sum up to this booking exceeded capacity; the booking
    /// was cancelled in place with reason `capacity_exceeded`.
    Rejected {
        /// Seats held after the rejection was applied.
        booked: i32,
        /// The slot's capacity.
        capacity: i32,
    },
    /// The slot was closed between lookup and admission; the booking was
    /// cancelled in place with reason `slot_closed`.
    SlotClosed,
}

/// Result of recomputing a slot's seat tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileReport {
    /// The reconciled slot.
    pub slot_id: SlotId,
    /// Seats held by non-cancelled bookings (freshly recounted).
    pub booked: i32,
    /// The slot's capacity.
    pub capacity: i32,
    /// Status written alongside the tally.
    pub status: SlotStatus,
    /// True when the recount exceeds capacity (anomaly: manual edits or
    /// capacity reduction). The true count is written regardless.
    pub capacity_exceeded: bool,
}

/// Storage operations the reservation engine needs.
///
/// Implementations must guarantee:
/// - `insert_pending` never conflicts with concurrent inserts and assigns
///   a monotone `admission_seq`;
/// - `admit` decides each booking's fate atomically with the slot tally
///   rewrite, ordered by `admission_seq`;
/// - `reconcile` always recomputes from the full booking set (idempotent,
///   safe to repeat and to run concurrently);
/// - `apply_discount` consumes the voucher and updates the booking
///   amounts in one atomic step, and reports a lost claim as `false`.
#[async_trait]
pub trait ReservationStore: Send + Sync + 'static {
    /// Find the slot for (trek, date) if it is open for booking.
    async fn find_open_slot(
        &self,
        trek_slug: &str,
        departure_date: NaiveDate,
    ) -> AppResult<Option<Slot>>;

    /// Insert a booking in `pending_approval` with no discount.
    async fn insert_pending(&self, booking: &NewBooking) -> AppResult<Booking>;

    /// Decide the fate of a just-inserted booking against the slot's
    /// capacity and rewrite the slot tally.
    async fn admit(&self, slot_id: SlotId, booking_id: BookingId)
        -> AppResult<AdmissionOutcome>;

    /// Recompute the slot's seat tally from the booking set.
    async fn reconcile(&self, slot_id: SlotId) -> AppResult<ReconcileReport>;

    /// Cancel a still-pending booking with the given reason. Fails with a
    /// conflict if the booking already left `pending_approval`.
    async fn cancel_pending(
        &self,
        booking_id: BookingId,
        reason: CancellationReason,
    ) -> AppResult<()>;

    /// Find a booking by ID.
    async fn find_booking(&self, booking_id: BookingId) -> AppResult<Option<Booking>>;

    /// Move a booking's lifecycle status with a compare-and-swap on the
    /// expected current status. Returns `None` on a lost race.
    async fn transition(
        &self,
        booking_id: BookingId,
        from: BookingStatus,
        to: BookingStatus,
        decided_by: Option<UserId>,
        reason: Option<CancellationReason>,
    ) -> AppResult<Option<Booking>>;

    /// Move a booking's payment track with a compare-and-swap on the
    /// expected current payment status. Returns `None` on a lost race.
    async fn transition_payment(
        &self,
        booking_id: BookingId,
        from: PaymentStatus,
        to: PaymentStatus,
    ) -> AppResult<Option<Booking>>;

    /// Find a voucher by code.
    async fn find_voucher(&self, code: &str) -> AppResult<Option<Voucher>>;

    /// Check whether a user already redeemed a personal voucher.
    async fn user_redeemed(&self, voucher_id: VoucherId, user_id: UserId) -> AppResult<bool>;

    /// Atomically consume the voucher for a booking and write the
    /// discounted amounts. Returns `false` when the claim was lost to a
    /// concurrent booking (nothing is written in that case).
    async fn apply_discount(
        &self,
        booking_id: BookingId,
        voucher: &Voucher,
        user_id: UserId,
        discount: i64,
    ) -> AppResult<bool>;

    /// Insert participant sub-records. Per-record failures are logged and
    /// skipped; returns the number of records actually written.
    async fn insert_participants(
        &self,
        booking_id: BookingId,
        participants: &[NewParticipant],
    ) -> AppResult<usize>;
}
