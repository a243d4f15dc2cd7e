//! Participant sub-records owned by a booking.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A participant covered by a booking.
///
/// Strongly owned: participant rows are cascade-deleted with their
/// booking. Write failures on these rows are non-fatal to the booking;
/// the repair sweep flags shortfalls.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Participant {
    /// Unique participant record identifier.
    pub id: Uuid,
    /// The owning booking.
    pub booking_id: Uuid,
    /// Full legal name.
    pub full_name: String,
    /// Date of birth.
    pub date_of_birth: Option<NaiveDate>,
    /// Emergency contact phone number.
    pub emergency_contact: Option<String>,
    /// Declared medical conditions relevant to the trek.
    pub medical_notes: Option<String>,
    /// Whether the liability waiver was accepted.
    pub waiver_accepted: bool,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

/// Data for one participant supplied at booking time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewParticipant {
    /// Full legal name.
    pub full_name: String,
    /// Date of birth.
    pub date_of_birth: Option<NaiveDate>,
    /// Emergency contact phone number.
    pub emergency_contact: Option<String>,
    /// Declared medical conditions relevant to the trek.
    pub medical_notes: Option<String>,
    /// Whether the liability waiver was accepted.
    pub waiver_accepted: bool,
}
