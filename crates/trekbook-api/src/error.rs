//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use trekbook_core::error::{AppError, ErrorKind};

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

/// Wrapper giving [`AppError`] an HTTP rendering.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0.kind {
            ErrorKind::Validation | ErrorKind::VoucherInvalid => StatusCode::BAD_REQUEST,
            ErrorKind::Authentication => StatusCode::UNAUTHORIZED,
            ErrorKind::Authorization => StatusCode::FORBIDDEN,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict
            | ErrorKind::SlotUnavailable
            | ErrorKind::CapacityExceeded
            | ErrorKind::VoucherConsumed => StatusCode::CONFLICT,
            ErrorKind::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::Database
            | ErrorKind::Serialization
            | ErrorKind::Configuration
            | ErrorKind::Internal => {
                tracing::error!(error = %self.0, "Internal server error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ApiErrorResponse {
            error: self.0.kind.to_string(),
            message: self.0.message,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_for(err: AppError) -> StatusCode {
        let response = ApiError(err).into_response();
        response.status()
    }

    #[test]
    fn test_domain_errors_map_to_conflict() {
        assert_eq!(
            status_for(AppError::slot_unavailable("full")),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_for(AppError::capacity_exceeded("no seats")),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_for(AppError::voucher_consumed("raced")),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_validation_maps_to_bad_request() {
        assert_eq!(
            status_for(AppError::validation("bad input")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(AppError::voucher_invalid("expired")),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_auth_errors() {
        assert_eq!(
            status_for(AppError::authentication("who are you")),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_for(AppError::authorization("admins only")),
            StatusCode::FORBIDDEN
        );
    }
}
