//! Slot-lifecycle domain events.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Events related to departure slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SlotEvent {
    /// A new departure slot was scheduled.
    Scheduled {
        /// The slot ID.
        slot_id: Uuid,
        /// The trek this slot belongs to.
        trek_slug: String,
        /// Departure date.
        departure_date: NaiveDate,
        /// Seat capacity.
        capacity: i32,
    },
    /// A slot was closed to new bookings.
    Closed {
        /// The slot ID.
        slot_id: Uuid,
    },
}
