//! `AuthUser` extractor — reads the identity forwarded by the upstream
//! auth gateway and injects a [`RequestContext`].
//!
//! Session issuance and verification happen outside this service; the
//! gateway strips any client-supplied identity headers and sets
//! `x-user-id` (and `x-user-role` for back-office traffic) on verified
//! requests only.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use trekbook_core::error::AppError;
use trekbook_core::types::actor::ActorRole;
use trekbook_service::context::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the verified user id.
const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the caller's role.
const USER_ROLE_HEADER: &str = "x-user-role";

/// Extracted authenticated caller context available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::authentication("Missing identity header"))?;

        let user_id: Uuid = user_id
            .parse()
            .map_err(|_| AppError::authentication("Malformed identity header"))?;

        // Unknown or absent role degrades to customer, never to admin.
        let role = parts
            .headers
            .get(USER_ROLE_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(ActorRole::parse)
            .unwrap_or(ActorRole::Customer);

        Ok(AuthUser(RequestContext::new(user_id, role)))
    }
}
