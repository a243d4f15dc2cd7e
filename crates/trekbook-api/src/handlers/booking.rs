//! Booking handlers.

use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

use trekbook_entity::booking::participant::Participant;
use trekbook_service::booking::engine::{
    BookingConfirmation, CreateBookingRequest as EngineRequest,
};

use crate::dto::request::CreateBookingRequest;
use crate::dto::response::{ApiResponse, BookingResponse};
use crate::dto::validate;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/bookings
pub async fn create_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateBookingRequest>,
) -> Result<Json<ApiResponse<BookingConfirmation>>, ApiError> {
    validate(&req)?;

    let confirmation = state
        .engine
        .create_booking(
            &auth,
            EngineRequest {
                trek_slug: req.trek_slug,
                departure_date: req.booking_date,
                participants: req.participants,
                contact_name: req.contact_name,
                contact_email: req.contact_email,
                contact_phone: req.contact_phone,
                voucher_code: req.voucher_code,
                participant_details: req
                    .participant_details
                    .into_iter()
                    .map(Into::into)
                    .collect(),
            },
        )
        .await?;

    Ok(Json(ApiResponse::ok(confirmation)))
}

/// GET /api/bookings/{id}
pub async fn get_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<BookingResponse>>, ApiError> {
    let booking = state.booking_queries.get(&auth, id).await?;
    Ok(Json(ApiResponse::ok(booking.into())))
}

/// GET /api/bookings/{id}/participants
pub async fn get_participants(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<Participant>>>, ApiError> {
    let participants = state.booking_queries.participants(&auth, id).await?;
    Ok(Json(ApiResponse::ok(participants)))
}

/// GET /api/bookings
pub async fn list_own_bookings(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<BookingResponse>>>, ApiError> {
    let bookings = state.booking_queries.list_own(&auth).await?;
    Ok(Json(ApiResponse::ok(
        bookings.into_iter().map(Into::into).collect(),
    )))
}
