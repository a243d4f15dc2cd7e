//! Public slot availability handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use chrono::Utc;

use crate::dto::request::AvailabilityQuery;
use crate::dto::response::{ApiResponse, SlotResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/treks/{slug}/slots
pub async fn availability(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<ApiResponse<Vec<SlotResponse>>>, ApiError> {
    let from = query.from.unwrap_or_else(|| Utc::now().date_naive());
    let slots = state.slots.availability(&slug, from).await?;
    Ok(Json(ApiResponse::ok(
        slots.into_iter().map(Into::into).collect(),
    )))
}
