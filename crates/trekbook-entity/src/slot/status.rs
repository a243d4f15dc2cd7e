//! Slot status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a departure slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "slot_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    /// Accepting bookings.
    Open,
    /// All seats are taken.
    Full,
    /// Closed by an admin or archived after departure.
    Closed,
}

impl SlotStatus {
    /// Derive the status from the current seat tally.
    ///
    /// `Closed` is sticky and never derived; reconciliation only moves a
    /// slot between `Open` and `Full`.
    pub fn derive(booked: i32, capacity: i32) -> Self {
        if booked >= capacity {
            Self::Full
        } else {
            Self::Open
        }
    }

    /// Check whether new bookings are admitted.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Full => "full",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_full_only_when_capacity_reached() {
        assert_eq!(SlotStatus::derive(0, 10), SlotStatus::Open);
        assert_eq!(SlotStatus::derive(9, 10), SlotStatus::Open);
        assert_eq!(SlotStatus::derive(10, 10), SlotStatus::Full);
        // Over-capacity (manual edits) still reads as full.
        assert_eq!(SlotStatus::derive(11, 10), SlotStatus::Full);
    }
}
