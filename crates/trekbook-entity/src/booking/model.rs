//! Booking entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::{BookingStatus, CancellationReason, PaymentStatus};

/// Minimum participants per booking.
pub const MIN_PARTICIPANTS: i32 = 1;
/// Maximum participants per booking.
pub const MAX_PARTICIPANTS: i32 = 20;

/// One reservation request covering 1–20 participants against one slot.
///
/// Bookings are never physically deleted; terminal outcomes are recorded
/// in `status` and `cancellation_reason` so the row remains the audit
/// trail.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    /// Unique booking identifier.
    pub id: Uuid,
    /// The user who made the booking (verified by the auth gateway).
    pub user_id: Uuid,
    /// The slot booked against (weak reference).
    pub slot_id: Uuid,
    /// Number of participants covered (1–20).
    pub participants: i32,

    // -- Contact --
    /// Name of the person making the booking.
    pub contact_name: String,
    /// Contact email.
    pub contact_email: String,
    /// Contact phone.
    pub contact_phone: Option<String>,

    // -- Amounts (whole INR) --
    /// Trek price × participants.
    pub base_amount: i64,
    /// 5% GST on the base amount.
    pub gst_amount: i64,
    /// Voucher discount applied (zero without a voucher).
    pub discount_amount: i64,
    /// Amount payable: `base + gst - discount`.
    pub total_amount: i64,
    /// The voucher consumed for this booking (weak reference).
    pub voucher_id: Option<Uuid>,

    // -- State --
    /// Lifecycle status.
    pub status: BookingStatus,
    /// Payment track (independent of `status`).
    pub payment_status: PaymentStatus,
    /// Why the booking was cancelled (set iff status is cancelled).
    pub cancellation_reason: Option<CancellationReason>,

    // -- Admission ordering --
    /// Monotone sequence assigned at insert; orders concurrent
    /// admissions against the same slot.
    pub admission_seq: i64,

    // -- Decision audit --
    /// The admin who confirmed or rejected the booking.
    pub decided_by: Option<Uuid>,
    /// When the admin decision was made.
    pub decided_at: Option<DateTime<Utc>>,

    // -- Timestamps --
    /// When the booking was created.
    pub created_at: DateTime<Utc>,
    /// When the booking was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Check whether this booking currently holds seats on its slot.
    pub fn holds_seat(&self) -> bool {
        self.status.holds_seat()
    }

    /// Check whether the booking has reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Check whether the participant count is within the allowed range.
    pub fn valid_participants(count: i32) -> bool {
        (MIN_PARTICIPANTS..=MAX_PARTICIPANTS).contains(&count)
    }
}

/// Data required to create a new booking.
///
/// Bookings are always inserted as `pending_approval` with no discount;
/// the voucher step updates the amounts afterwards in its own
/// transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBooking {
    /// The booking user.
    pub user_id: Uuid,
    /// The target slot.
    pub slot_id: Uuid,
    /// Number of participants (1–20).
    pub participants: i32,
    /// Contact name.
    pub contact_name: String,
    /// Contact email.
    pub contact_email: String,
    /// Contact phone.
    pub contact_phone: Option<String>,
    /// Trek price × participants.
    pub base_amount: i64,
    /// 5% GST on the base amount.
    pub gst_amount: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participant_bounds() {
        assert!(!Booking::valid_participants(0));
        assert!(Booking::valid_participants(1));
        assert!(Booking::valid_participants(20));
        assert!(!Booking::valid_participants(21));
        assert!(!Booking::valid_participants(-3));
    }
}
