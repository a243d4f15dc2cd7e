//! Admin voucher handlers.

use axum::Json;
use axum::extract::State;

use trekbook_service::voucher::admin::CreateVoucherParams;

use crate::dto::request::CreateVoucherRequest;
use crate::dto::response::{ApiResponse, VoucherResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/admin/vouchers
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateVoucherRequest>,
) -> Result<Json<ApiResponse<VoucherResponse>>, ApiError> {
    let voucher = state
        .voucher_admin
        .create(
            &auth,
            CreateVoucherParams {
                code: req.code,
                kind: req.kind,
                discount_percent: req.discount_percent,
                flat_amount: req.flat_amount,
                minimum_amount: req.minimum_amount,
                maximum_discount: req.maximum_discount,
                valid_until: req.valid_until,
            },
        )
        .await?;

    Ok(Json(ApiResponse::ok(voucher.into())))
}
