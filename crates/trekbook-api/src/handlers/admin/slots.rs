//! Admin slot handlers.

use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

use trekbook_entity::slot::model::NewSlot;

use crate::dto::request::ScheduleSlotRequest;
use crate::dto::response::{ApiResponse, MessageResponse, ReconcileResponse, SlotResponse};
use crate::dto::validate;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/admin/slots
pub async fn schedule(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<ScheduleSlotRequest>,
) -> Result<Json<ApiResponse<SlotResponse>>, ApiError> {
    validate(&req)?;

    let slot = state
        .slots
        .schedule(
            &auth,
            NewSlot {
                trek_slug: req.trek_slug,
                departure_date: req.departure_date,
                capacity: req.capacity,
            },
        )
        .await?;

    Ok(Json(ApiResponse::ok(slot.into())))
}

/// POST /api/admin/slots/{id}/close
pub async fn close(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.slots.close(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Slot closed".to_string(),
    })))
}

/// POST /api/admin/slots/{id}/reconcile
pub async fn reconcile(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ReconcileResponse>>, ApiError> {
    let report = state.slots.reconcile(&auth, id).await?;
    Ok(Json(ApiResponse::ok(report.into())))
}
