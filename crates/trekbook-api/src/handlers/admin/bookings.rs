//! Admin booking lifecycle handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use trekbook_core::types::pagination::{PageRequest, PageResponse};

use crate::dto::request::UpdatePaymentRequest;
use crate::dto::response::{ApiResponse, BookingResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/admin/bookings
pub async fn list_bookings(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(page): Query<PageRequest>,
) -> Result<Json<ApiResponse<PageResponse<BookingResponse>>>, ApiError> {
    let bookings = state.booking_queries.list_all(&auth, &page).await?;
    let page_out = PageResponse::new(
        bookings.items.into_iter().map(Into::into).collect(),
        bookings.page,
        bookings.page_size,
        bookings.total_items,
    );
    Ok(Json(ApiResponse::ok(page_out)))
}

/// POST /api/admin/bookings/{id}/approve
pub async fn approve(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<BookingResponse>>, ApiError> {
    let booking = state.booking_admin.approve(&auth, id).await?;
    Ok(Json(ApiResponse::ok(booking.into())))
}

/// POST /api/admin/bookings/{id}/reject
pub async fn reject(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<BookingResponse>>, ApiError> {
    let booking = state.booking_admin.reject(&auth, id).await?;
    Ok(Json(ApiResponse::ok(booking.into())))
}

/// POST /api/admin/bookings/{id}/cancel
pub async fn cancel(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<BookingResponse>>, ApiError> {
    let booking = state.booking_admin.cancel(&auth, id).await?;
    Ok(Json(ApiResponse::ok(booking.into())))
}

/// POST /api/admin/bookings/{id}/complete
pub async fn complete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<BookingResponse>>, ApiError> {
    let booking = state.booking_admin.complete(&auth, id).await?;
    Ok(Json(ApiResponse::ok(booking.into())))
}

/// PUT /api/admin/bookings/{id}/payment
pub async fn update_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdatePaymentRequest>,
) -> Result<Json<ApiResponse<BookingResponse>>, ApiError> {
    let booking = state
        .booking_admin
        .set_payment_status(&auth, id, req.payment_status)
        .await?;
    Ok(Json(ApiResponse::ok(booking.into())))
}
