//! Notification sink implementations.

use async_trait::async_trait;
use tracing::info;

use trekbook_core::events::DomainEvent;
use trekbook_core::traits::NotificationSink;

/// Sink that logs events through `tracing`.
///
/// Downstream consumers (email dispatch, analytics) tail the structured
/// log stream out-of-process; delivery never blocks or fails the
/// emitting operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TracingSink {
    /// Creates a new tracing sink.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotificationSink for TracingSink {
    async fn notify(&self, event: &DomainEvent) {
        info!(
            event_id = %event.id,
            actor = ?event.actor_id,
            payload = ?event.payload,
            "Domain event"
        );
    }
}
