//! Departure slot entity model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::SlotStatus;

/// One bookable departure date for one trek.
///
/// `booked` is a materialized seat tally recomputed from the authoritative
/// booking set by reconciliation; request-handling code never increments
/// it directly.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Slot {
    /// Unique slot identifier.
    pub id: Uuid,
    /// The trek this slot belongs to.
    pub trek_slug: String,
    /// Departure date.
    pub departure_date: NaiveDate,
    /// Total seat capacity.
    pub capacity: i32,
    /// Seats held by non-cancelled bookings (sum of their participants).
    pub booked: i32,
    /// Current slot status.
    pub status: SlotStatus,
    /// When the slot was scheduled.
    pub created_at: DateTime<Utc>,
    /// When the slot was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Slot {
    /// Remaining seats, never negative.
    pub fn seats_left(&self) -> i32 {
        (self.capacity - self.booked).max(0)
    }

    /// Check whether the slot admits new bookings.
    pub fn is_open(&self) -> bool {
        self.status.is_open()
    }
}

/// Data required to schedule a new slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSlot {
    /// The trek this slot belongs to.
    pub trek_slug: String,
    /// Departure date.
    pub departure_date: NaiveDate,
    /// Total seat capacity.
    pub capacity: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(capacity: i32, booked: i32) -> Slot {
        Slot {
            id: Uuid::new_v4(),
            trek_slug: "annapurna-base-camp".to_string(),
            departure_date: NaiveDate::from_ymd_opt(2026, 10, 12).unwrap(),
            capacity,
            booked,
            status: SlotStatus::derive(booked, capacity),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_seats_left_never_negative() {
        assert_eq!(slot(10, 3).seats_left(), 7);
        assert_eq!(slot(10, 12).seats_left(), 0);
    }

    #[test]
    fn test_full_slot_is_not_open() {
        assert!(slot(10, 9).is_open());
        assert!(!slot(10, 10).is_open());
    }
}
