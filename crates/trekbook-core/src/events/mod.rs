//! Domain events emitted by TrekBook operations.
//!
//! Events are handed to the [`crate::traits::NotificationSink`] after a
//! state change commits. Downstream consumers (email dispatch, analytics
//! dashboards) subscribe out-of-process; this crate only defines the
//! contract.

pub mod booking;
pub mod slot;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use booking::BookingEvent;
pub use slot::SlotEvent;

/// Wrapper for all domain events with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Unique event ID.
    pub id: Uuid,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// The user who caused the event (if applicable).
    pub actor_id: Option<Uuid>,
    /// The event payload.
    pub payload: EventPayload,
}

/// Union of all domain event types.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event")]
pub enum EventPayload {
    /// A booking-lifecycle event.
    Booking(BookingEvent),
    /// A slot-lifecycle event.
    Slot(SlotEvent),
}

impl DomainEvent {
    /// Create a new domain event.
    pub fn new(actor_id: Option<Uuid>, payload: EventPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            actor_id,
            payload,
        }
    }

    /// Create a new booking event.
    pub fn booking(actor_id: Option<Uuid>, event: BookingEvent) -> Self {
        Self::new(actor_id, EventPayload::Booking(event))
    }

    /// Create a new slot event.
    pub fn slot(actor_id: Option<Uuid>, event: SlotEvent) -> Self {
        Self::new(actor_id, EventPayload::Slot(event))
    }
}
