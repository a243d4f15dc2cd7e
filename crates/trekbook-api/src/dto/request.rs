//! Request DTOs with validation.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use trekbook_entity::booking::participant::NewParticipant;
use trekbook_entity::booking::status::PaymentStatus;
use trekbook_entity::voucher::model::VoucherKind;

/// One participant in a booking request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ParticipantRequest {
    /// Full legal name.
    #[validate(length(min = 1, max = 200))]
    pub full_name: String,
    /// Date of birth.
    pub date_of_birth: Option<NaiveDate>,
    /// Emergency contact phone number.
    pub emergency_contact: Option<String>,
    /// Declared medical conditions.
    pub medical_notes: Option<String>,
    /// Whether the liability waiver was accepted.
    #[serde(default)]
    pub waiver_accepted: bool,
}

impl From<ParticipantRequest> for NewParticipant {
    fn from(req: ParticipantRequest) -> Self {
        Self {
            full_name: req.full_name,
            date_of_birth: req.date_of_birth,
            emergency_contact: req.emergency_contact,
            medical_notes: req.medical_notes,
            waiver_accepted: req.waiver_accepted,
        }
    }
}

/// Booking creation request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateBookingRequest {
    /// The trek to book.
    #[validate(length(min = 1, message = "Trek is required"))]
    pub trek_slug: String,
    /// Departure date of the target slot.
    pub booking_date: NaiveDate,
    /// Number of participants.
    #[validate(range(min = 1, max = 20, message = "Participants must be between 1 and 20"))]
    pub participants: i32,
    /// Contact name.
    #[validate(length(min = 1, message = "Contact name is required"))]
    pub contact_name: String,
    /// Contact email.
    #[validate(email(message = "A valid contact email is required"))]
    pub contact_email: String,
    /// Contact phone.
    pub contact_phone: Option<String>,
    /// Optional voucher code.
    pub voucher_code: Option<String>,
    /// Participant details.
    #[serde(default)]
    #[validate(nested)]
    pub participant_details: Vec<ParticipantRequest>,
}

/// Voucher preview request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VoucherPreviewRequest {
    /// The voucher code.
    #[validate(length(min = 1, message = "Code is required"))]
    pub code: String,
    /// The booking amount the voucher would apply to.
    #[validate(range(min = 1, message = "Amount must be positive"))]
    pub amount: i64,
}

/// Slot scheduling request body (admin).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ScheduleSlotRequest {
    /// The trek to schedule.
    #[validate(length(min = 1, message = "Trek is required"))]
    pub trek_slug: String,
    /// Departure date.
    pub departure_date: NaiveDate,
    /// Seat capacity.
    #[validate(range(min = 1, message = "Capacity must be positive"))]
    pub capacity: i32,
}

/// Voucher creation request body (admin).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVoucherRequest {
    /// Explicit code; generated when absent.
    pub code: Option<String>,
    /// Consumption mode.
    pub kind: VoucherKind,
    /// Percentage discount.
    pub discount_percent: Option<i32>,
    /// Flat discount amount.
    pub flat_amount: Option<i64>,
    /// Minimum booking amount.
    #[serde(default)]
    pub minimum_amount: i64,
    /// Cap on the computed discount.
    pub maximum_discount: Option<i64>,
    /// Expiry.
    pub valid_until: Option<DateTime<Utc>>,
}

/// Payment status update request body (admin).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePaymentRequest {
    /// The new payment status.
    pub payment_status: PaymentStatus,
}

/// Availability query parameters.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AvailabilityQuery {
    /// Earliest departure date to include (defaults to today).
    pub from: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking_request(participants: i32) -> CreateBookingRequest {
        CreateBookingRequest {
            trek_slug: "hampta-pass".to_string(),
            booking_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            participants,
            contact_name: "Asha Rao".to_string(),
            contact_email: "asha@example.com".to_string(),
            contact_phone: None,
            voucher_code: None,
            participant_details: Vec::new(),
        }
    }

    #[test]
    fn test_participant_bounds_validated() {
        assert!(booking_request(1).validate().is_ok());
        assert!(booking_request(20).validate().is_ok());
        assert!(booking_request(0).validate().is_err());
        assert!(booking_request(21).validate().is_err());
    }

    #[test]
    fn test_email_validated() {
        let mut req = booking_request(2);
        req.contact_email = "not-an-email".to_string();
        assert!(req.validate().is_err());
    }
}
