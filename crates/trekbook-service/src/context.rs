//! Request context carrying the authenticated caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use trekbook_core::error::AppError;
use trekbook_core::result::AppResult;
use trekbook_core::types::actor::ActorRole;

/// Context for the current authenticated request.
///
/// Identity is an external collaborator: the upstream gateway verifies
/// the session and forwards the user id and role, which the API layer
/// extracts into this struct and passes into service methods.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: Uuid,
    /// The caller's role.
    pub role: ActorRole,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: Uuid, role: ActorRole) -> Self {
        Self {
            user_id,
            role,
            request_time: Utc::now(),
        }
    }

    /// Returns whether the current caller is an admin.
    pub fn is_admin(&self) -> bool {
        matches!(self.role, ActorRole::Admin)
    }

    /// Fails unless the current caller is an admin.
    pub fn require_admin(&self) -> AppResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::authorization(
                "This action requires an administrative actor",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_admin() {
        let admin = RequestContext::new(Uuid::new_v4(), ActorRole::Admin);
        let customer = RequestContext::new(Uuid::new_v4(), ActorRole::Customer);
        assert!(admin.require_admin().is_ok());
        assert!(customer.require_admin().is_err());
    }
}
