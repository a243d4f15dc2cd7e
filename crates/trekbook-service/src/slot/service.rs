//! Slot scheduling, closing, availability, and manual reconciliation.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;
use uuid::Uuid;

use trekbook_core::error::AppError;
use trekbook_core::events::{DomainEvent, SlotEvent};
use trekbook_core::result::AppResult;
use trekbook_core::traits::NotificationSink;
use trekbook_database::repositories::{SlotRepository, TrekRepository};
use trekbook_database::store::{ReconcileReport, ReservationStore};
use trekbook_entity::slot::model::{NewSlot, Slot};

use crate::context::RequestContext;

/// Admin slot management and public availability queries.
pub struct SlotService {
    /// Slot repository.
    slots: Arc<SlotRepository>,
    /// Trek catalog repository.
    treks: Arc<TrekRepository>,
    /// Reservation store (for reconciliation).
    store: Arc<dyn ReservationStore>,
    /// Lifecycle event sink.
    sink: Arc<dyn NotificationSink>,
}

impl SlotService {
    /// Creates a new slot service.
    pub fn new(
        slots: Arc<SlotRepository>,
        treks: Arc<TrekRepository>,
        store: Arc<dyn ReservationStore>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            slots,
            treks,
            store,
            sink,
        }
    }

    /// Schedule a new departure slot. Admin-only.
    pub async fn schedule(&self, ctx: &RequestContext, new: NewSlot) -> AppResult<Slot> {
        ctx.require_admin()?;

        if new.capacity <= 0 {
            return Err(AppError::validation("Capacity must be positive"));
        }
        self.treks
            .find_active_by_slug(&new.trek_slug)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Trek {} is not in the catalog", new.trek_slug))
            })?;
        if self
            .slots
            .find_by_trek_date(&new.trek_slug, new.departure_date)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(format!(
                "A slot for {} on {} already exists",
                new.trek_slug, new.departure_date
            )));
        }

        let slot = self.slots.create(&new).await?;

        self.sink
            .notify(&DomainEvent::slot(
                Some(ctx.user_id),
                SlotEvent::Scheduled {
                    slot_id: slot.id,
                    trek_slug: slot.trek_slug.clone(),
                    departure_date: slot.departure_date,
                    capacity: slot.capacity,
                },
            ))
            .await;

        info!(slot_id = %slot.id, trek = %slot.trek_slug, "Slot scheduled");
        Ok(slot)
    }

    /// Close a slot to new bookings. Admin-only. Existing bookings keep
    /// their seats.
    pub async fn close(&self, ctx: &RequestContext, slot_id: Uuid) -> AppResult<()> {
        ctx.require_admin()?;
        self.slots.close(slot_id).await?;

        self.sink
            .notify(&DomainEvent::slot(
                Some(ctx.user_id),
                SlotEvent::Closed { slot_id },
            ))
            .await;

        info!(%slot_id, "Slot closed");
        Ok(())
    }

    /// List open departures for a trek on or after `from_date`.
    pub async fn availability(
        &self,
        trek_slug: &str,
        from_date: NaiveDate,
    ) -> AppResult<Vec<Slot>> {
        self.slots.list_open_by_trek(trek_slug, from_date).await
    }

    /// Recompute a slot's seat tally out-of-band. Admin-only repair
    /// action; safe to run any time.
    pub async fn reconcile(
        &self,
        ctx: &RequestContext,
        slot_id: Uuid,
    ) -> AppResult<ReconcileReport> {
        ctx.require_admin()?;
        self.store.reconcile(slot_id.into()).await
    }
}
