//! Notification sink collaborator boundary.

use async_trait::async_trait;

use crate::events::DomainEvent;

/// Consumer of booking-lifecycle events.
///
/// Delivery is fire-and-forget: implementations must not fail the
/// emitting operation. Email dispatch and analytics consume these events
/// outside this service.
#[async_trait]
pub trait NotificationSink: Send + Sync + 'static {
    /// Deliver a domain event. Implementations swallow and log their own
    /// errors; the caller never observes a delivery failure.
    async fn notify(&self, event: &DomainEvent);
}
