//! Participant sub-record repair flagging.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing;

use trekbook_database::repositories::BookingRepository;
use trekbook_entity::job::model::Job;

use crate::executor::{JobExecutionError, JobHandler};

/// Flags seat-holding bookings whose stored participant records fall
/// short of their participant count.
///
/// Participant writes at booking time are best-effort; the booking's own
/// fields stay authoritative. This sweep surfaces the shortfalls so
/// operations can chase the missing details.
pub struct ParticipantRepairHandler {
    /// Booking repository.
    bookings: Arc<BookingRepository>,
}

impl std::fmt::Debug for ParticipantRepairHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParticipantRepairHandler").finish()
    }
}

impl ParticipantRepairHandler {
    /// Create a new repair handler.
    pub fn new(bookings: Arc<BookingRepository>) -> Self {
        Self { bookings }
    }
}

#[async_trait]
impl JobHandler for ParticipantRepairHandler {
    fn job_type(&self) -> &str {
        "participant_repair"
    }

    async fn execute(&self, _job: &Job) -> Result<Option<Value>, JobExecutionError> {
        let shortfalls = self
            .bookings
            .find_participant_shortfalls()
            .await
            .map_err(|e| JobExecutionError::Transient(format!("Shortfall scan failed: {}", e)))?;

        for shortfall in &shortfalls {
            tracing::warn!(
                booking_id = %shortfall.booking_id,
                expected = shortfall.expected,
                actual = shortfall.actual,
                "Booking is missing participant records"
            );
        }

        tracing::info!(flagged = shortfalls.len(), "Participant repair sweep complete");

        Ok(Some(serde_json::json!({ "flagged": shortfalls.len() })))
    }
}
