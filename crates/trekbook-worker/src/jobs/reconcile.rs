//! Slot reconciliation sweep and departed-slot archival.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tracing;

use trekbook_database::repositories::SlotRepository;
use trekbook_database::store::ReservationStore;
use trekbook_entity::job::model::Job;

use crate::executor::{JobExecutionError, JobHandler};

/// Recomputes seat tallies for every non-closed slot.
///
/// The admission path keeps tallies correct on its own; this sweep is
/// the out-of-band repair for drift from manual data edits and requests
/// that died mid-flow.
pub struct SlotReconcileHandler {
    /// Slot repository.
    slots: Arc<SlotRepository>,
    /// Reservation store (owns the reconcile transaction).
    store: Arc<dyn ReservationStore>,
}

impl std::fmt::Debug for SlotReconcileHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlotReconcileHandler").finish()
    }
}

impl SlotReconcileHandler {
    /// Create a new reconcile sweep handler.
    pub fn new(slots: Arc<SlotRepository>, store: Arc<dyn ReservationStore>) -> Self {
        Self { slots, store }
    }
}

#[async_trait]
impl JobHandler for SlotReconcileHandler {
    fn job_type(&self) -> &str {
        "slot_reconcile"
    }

    async fn execute(&self, _job: &Job) -> Result<Option<Value>, JobExecutionError> {
        let slot_ids = self
            .slots
            .list_reconcilable_ids()
            .await
            .map_err(|e| JobExecutionError::Transient(format!("Slot listing failed: {}", e)))?;

        let mut swept = 0u64;
        let mut drifted = 0u64;
        let mut anomalies = 0u64;

        for slot_id in slot_ids {
            let before = self
                .slots
                .find_by_id(slot_id)
                .await
                .map_err(|e| JobExecutionError::Transient(format!("Slot fetch failed: {}", e)))?;

            let report = match self.store.reconcile(slot_id.into()).await {
                Ok(report) => report,
                Err(e) => {
                    // The slot may have been removed between listing and
                    // reconcile; skip it and keep sweeping.
                    tracing::warn!(%slot_id, error = %e, "Reconcile skipped a slot");
                    continue;
                }
            };

            swept += 1;
            if before.is_some_and(|s| s.booked != report.booked) {
                drifted += 1;
                tracing::warn!(%slot_id, booked = report.booked, "Reconcile corrected drift");
            }
            if report.capacity_exceeded {
                anomalies += 1;
            }
        }

        tracing::info!(swept, drifted, anomalies, "Slot reconcile sweep complete");

        Ok(Some(serde_json::json!({
            "swept": swept,
            "drifted": drifted,
            "anomalies": anomalies,
        })))
    }
}

/// Closes slots whose departure date has passed.
pub struct SlotArchiveHandler {
    /// Slot repository.
    slots: Arc<SlotRepository>,
}

impl std::fmt::Debug for SlotArchiveHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlotArchiveHandler").finish()
    }
}

impl SlotArchiveHandler {
    /// Create a new archive handler.
    pub fn new(slots: Arc<SlotRepository>) -> Self {
        Self { slots }
    }
}

#[async_trait]
impl JobHandler for SlotArchiveHandler {
    fn job_type(&self) -> &str {
        "slot_archive"
    }

    async fn execute(&self, _job: &Job) -> Result<Option<Value>, JobExecutionError> {
        let archived = self
            .slots
            .close_departed(Utc::now().date_naive())
            .await
            .map_err(|e| JobExecutionError::Transient(format!("Archival failed: {}", e)))?;

        tracing::info!(archived, "Departed slots archived");

        Ok(Some(serde_json::json!({ "archived": archived })))
    }
}
