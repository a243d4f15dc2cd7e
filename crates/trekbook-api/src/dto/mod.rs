//! Request and response DTOs.

pub mod request;
pub mod response;

use validator::Validate;

use trekbook_core::error::AppError;

use crate::error::ApiError;

/// Run `validator` checks and map failures to a validation error.
pub fn validate(value: &impl Validate) -> Result<(), ApiError> {
    value
        .validate()
        .map_err(|e| AppError::validation(e.to_string()).into())
}
