//! Booking-lifecycle domain events.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Events related to booking lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BookingEvent {
    /// A booking was created and admitted against a slot.
    Created {
        /// The booking ID.
        booking_id: Uuid,
        /// The slot the booking was admitted against.
        slot_id: Uuid,
        /// Number of participants covered.
        participants: i32,
        /// Final amount charged (after any discount).
        total_amount: i64,
        /// Whether a voucher discount was applied.
        voucher_applied: bool,
    },
    /// An admin confirmed a pending booking.
    Confirmed {
        /// The booking ID.
        booking_id: Uuid,
        /// The owning slot ID.
        slot_id: Uuid,
    },
    /// A booking was cancelled (admin rejection, user request, or
    /// post-admission capacity rejection).
    Cancelled {
        /// The booking ID.
        booking_id: Uuid,
        /// The owning slot ID.
        slot_id: Uuid,
        /// Machine-readable cancellation reason.
        reason: String,
    },
    /// A confirmed booking completed (the trek departed).
    Completed {
        /// The booking ID.
        booking_id: Uuid,
    },
    /// The payment status of a booking changed.
    PaymentUpdated {
        /// The booking ID.
        booking_id: Uuid,
        /// New payment status.
        payment_status: String,
    },
}
