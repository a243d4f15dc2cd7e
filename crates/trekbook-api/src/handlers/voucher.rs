//! Voucher preview handler.

use axum::Json;
use axum::extract::State;

use trekbook_core::error::ErrorKind;

use crate::dto::request::VoucherPreviewRequest;
use crate::dto::response::{ApiResponse, VoucherPreviewResponse};
use crate::dto::validate;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/vouchers/preview
///
/// Evaluates a voucher against an amount without consuming it. A
/// rejected voucher is a normal response, not an error — the storefront
/// shows the reason inline.
pub async fn preview(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<VoucherPreviewRequest>,
) -> Result<Json<ApiResponse<VoucherPreviewResponse>>, ApiError> {
    validate(&req)?;

    let preview = match state
        .voucher_resolver
        .evaluate(&req.code, req.amount, auth.user_id)
        .await
    {
        Ok(application) => VoucherPreviewResponse {
            valid: true,
            discount_amount: application.discount_amount,
            final_amount: application.final_amount,
            reason: None,
        },
        Err(e) if e.kind == ErrorKind::VoucherInvalid => VoucherPreviewResponse {
            valid: false,
            discount_amount: 0,
            final_amount: req.amount,
            reason: Some(e.message),
        },
        Err(e) => return Err(e.into()),
    };

    Ok(Json(ApiResponse::ok(preview)))
}
