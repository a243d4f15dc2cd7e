//! Booking status, payment status, and cancellation reason enumerations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a booking.
///
/// Every booking starts at `PendingApproval`; only an administrative
/// actor moves it forward. `Cancelled` and `Completed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "booking_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Awaiting admin decision.
    PendingApproval,
    /// Approved by an admin.
    Confirmed,
    /// Cancelled (admin rejection, user request, or capacity rejection).
    Cancelled,
    /// The trek departed with this booking confirmed.
    Completed,
}

impl BookingStatus {
    /// Check whether a transition to `next` is legal.
    pub fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::PendingApproval, Self::Confirmed)
                | (Self::PendingApproval, Self::Cancelled)
                | (Self::Confirmed, Self::Cancelled)
                | (Self::Confirmed, Self::Completed)
        )
    }

    /// Check if the status is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Completed)
    }

    /// Check whether a booking in this status holds seats against its slot.
    ///
    /// Reconciliation counts exactly these bookings when recomputing a
    /// slot's `booked` tally.
    pub fn holds_seat(&self) -> bool {
        matches!(self, Self::PendingApproval | Self::Confirmed)
    }

    /// Return the status as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PendingApproval => "pending_approval",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payment status of a booking; an independent axis from [`BookingStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// No payment expected yet.
    NotRequired,
    /// Payment initiated, awaiting gateway callback.
    Pending,
    /// Paid in full.
    Paid,
    /// The payment attempt failed.
    Failed,
    /// A completed payment was refunded.
    Refunded,
}

impl PaymentStatus {
    /// Check whether a transition to `next` is legal.
    ///
    /// A refund is only reachable from `Paid`; a failed payment may be
    /// retried.
    pub fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::NotRequired, Self::Pending)
                | (Self::NotRequired, Self::Paid)
                | (Self::NotRequired, Self::Failed)
                | (Self::Pending, Self::Paid)
                | (Self::Pending, Self::Failed)
                | (Self::Failed, Self::Pending)
                | (Self::Paid, Self::Refunded)
        )
    }

    /// Return the status as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotRequired => "not_required",
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Machine-readable reason a booking was cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "cancellation_reason", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CancellationReason {
    /// Admitting the booking would have exceeded slot capacity.
    CapacityExceeded,
    /// The slot was closed between lookup and admission.
    SlotClosed,
    /// The voucher was consumed by a concurrent booking.
    VoucherConflict,
    /// An admin rejected the pending request.
    AdminRejected,
    /// An admin cancelled a confirmed booking.
    AdminCancelled,
    /// The customer asked to cancel.
    UserRequested,
}

impl CancellationReason {
    /// Return the reason as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CapacityExceeded => "capacity_exceeded",
            Self::SlotClosed => "slot_closed",
            Self::VoucherConflict => "voucher_conflict",
            Self::AdminRejected => "admin_rejected",
            Self::AdminCancelled => "admin_cancelled",
            Self::UserRequested => "user_requested",
        }
    }
}

impl fmt::Display for CancellationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creation_always_starts_pending() {
        // No state reaches Confirmed or Completed without passing
        // through PendingApproval.
        assert!(!BookingStatus::Cancelled.can_transition_to(BookingStatus::Confirmed));
        assert!(!BookingStatus::Completed.can_transition_to(BookingStatus::Confirmed));
        assert!(BookingStatus::PendingApproval.can_transition_to(BookingStatus::Confirmed));
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        for next in [
            BookingStatus::PendingApproval,
            BookingStatus::Confirmed,
            BookingStatus::Cancelled,
            BookingStatus::Completed,
        ] {
            assert!(!BookingStatus::Cancelled.can_transition_to(next));
            assert!(!BookingStatus::Completed.can_transition_to(next));
        }
    }

    #[test]
    fn test_completion_requires_confirmation() {
        assert!(!BookingStatus::PendingApproval.can_transition_to(BookingStatus::Completed));
        assert!(BookingStatus::Confirmed.can_transition_to(BookingStatus::Completed));
    }

    #[test]
    fn test_seat_holding_statuses() {
        assert!(BookingStatus::PendingApproval.holds_seat());
        assert!(BookingStatus::Confirmed.holds_seat());
        assert!(!BookingStatus::Cancelled.holds_seat());
        assert!(!BookingStatus::Completed.holds_seat());
    }

    #[test]
    fn test_refund_only_from_paid() {
        assert!(PaymentStatus::Paid.can_transition_to(PaymentStatus::Refunded));
        assert!(!PaymentStatus::Pending.can_transition_to(PaymentStatus::Refunded));
        assert!(!PaymentStatus::Failed.can_transition_to(PaymentStatus::Refunded));
        assert!(!PaymentStatus::NotRequired.can_transition_to(PaymentStatus::Refunded));
    }

    #[test]
    fn test_failed_payment_can_retry() {
        assert!(PaymentStatus::Failed.can_transition_to(PaymentStatus::Pending));
    }
}
