//! Caller roles supplied by the upstream authentication gateway.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Role of the authenticated caller.
///
/// Identity and session issuance live outside this service; the gateway
/// forwards the verified user id and role with every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorRole {
    /// A regular customer booking treks.
    Customer,
    /// An administrative/back-office actor.
    Admin,
}

impl ActorRole {
    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Admin => "admin",
        }
    }

    /// Parse a role from its lowercase string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "customer" => Some(Self::Customer),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for ActorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrip() {
        assert_eq!(ActorRole::parse("admin"), Some(ActorRole::Admin));
        assert_eq!(ActorRole::parse(ActorRole::Customer.as_str()), Some(ActorRole::Customer));
        assert_eq!(ActorRole::parse("root"), None);
    }
}
