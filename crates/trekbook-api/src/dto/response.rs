//! Response DTOs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use trekbook_database::store::ReconcileReport;
use trekbook_entity::booking::model::Booking;
use trekbook_entity::slot::model::Slot;
use trekbook_entity::voucher::model::Voucher;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

/// Booking summary for responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingResponse {
    /// Booking ID.
    pub id: Uuid,
    /// Slot booked against.
    pub slot_id: Uuid,
    /// Participants covered.
    pub participants: i32,
    /// Base amount.
    pub base_amount: i64,
    /// GST amount.
    pub gst_amount: i64,
    /// Discount applied.
    pub discount_amount: i64,
    /// Amount payable.
    pub total_amount: i64,
    /// Lifecycle status.
    pub status: String,
    /// Payment status.
    pub payment_status: String,
    /// Cancellation reason, if cancelled.
    pub cancellation_reason: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id,
            slot_id: booking.slot_id,
            participants: booking.participants,
            base_amount: booking.base_amount,
            gst_amount: booking.gst_amount,
            discount_amount: booking.discount_amount,
            total_amount: booking.total_amount,
            status: booking.status.to_string(),
            payment_status: booking.payment_status.to_string(),
            cancellation_reason: booking.cancellation_reason.map(|r| r.to_string()),
            created_at: booking.created_at,
        }
    }
}

/// Slot availability for responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotResponse {
    /// Slot ID.
    pub id: Uuid,
    /// Trek slug.
    pub trek_slug: String,
    /// Departure date.
    pub departure_date: NaiveDate,
    /// Seat capacity.
    pub capacity: i32,
    /// Seats held.
    pub booked: i32,
    /// Seats still available.
    pub seats_left: i32,
    /// Status.
    pub status: String,
}

impl From<Slot> for SlotResponse {
    fn from(slot: Slot) -> Self {
        Self {
            id: slot.id,
            trek_slug: slot.trek_slug.clone(),
            departure_date: slot.departure_date,
            capacity: slot.capacity,
            booked: slot.booked,
            seats_left: slot.seats_left(),
            status: slot.status.to_string(),
        }
    }
}

/// Voucher preview result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoucherPreviewResponse {
    /// Whether the voucher would apply.
    pub valid: bool,
    /// Discount it would grant.
    pub discount_amount: i64,
    /// Amount payable after the discount.
    pub final_amount: i64,
    /// Why the voucher was rejected (when invalid).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Voucher summary for admin responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoucherResponse {
    /// Voucher ID.
    pub id: Uuid,
    /// Code.
    pub code: String,
    /// Consumption mode.
    pub kind: String,
    /// Percentage discount.
    pub discount_percent: Option<i32>,
    /// Flat discount amount.
    pub flat_amount: Option<i64>,
    /// Minimum booking amount.
    pub minimum_amount: i64,
    /// Discount cap.
    pub maximum_discount: Option<i64>,
    /// Expiry.
    pub valid_until: Option<DateTime<Utc>>,
}

impl From<Voucher> for VoucherResponse {
    fn from(voucher: Voucher) -> Self {
        Self {
            id: voucher.id,
            code: voucher.code,
            kind: voucher.kind.to_string(),
            discount_percent: voucher.discount_percent,
            flat_amount: voucher.flat_amount,
            minimum_amount: voucher.minimum_amount,
            maximum_discount: voucher.maximum_discount,
            valid_until: voucher.valid_until,
        }
    }
}

/// Reconciliation result for the admin repair endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileResponse {
    /// Reconciled slot.
    pub slot_id: Uuid,
    /// Recounted seats held.
    pub booked: i32,
    /// Slot capacity.
    pub capacity: i32,
    /// Status written.
    pub status: String,
    /// Whether the recount exceeded capacity.
    pub capacity_exceeded: bool,
}

impl From<ReconcileReport> for ReconcileResponse {
    fn from(report: ReconcileReport) -> Self {
        Self {
            slot_id: report.slot_id.into_uuid(),
            booked: report.booked,
            capacity: report.capacity,
            status: report.status.to_string(),
            capacity_exceeded: report.capacity_exceeded,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status: "ok" or "degraded".
    pub status: String,
    /// Whether the database responded.
    pub database: bool,
}
