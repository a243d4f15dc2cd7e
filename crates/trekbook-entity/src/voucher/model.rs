//! Voucher entity model and validation rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

/// How a voucher may be consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "voucher_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum VoucherKind {
    /// Consumable by exactly one successful booking.
    SingleUse,
    /// Usable once per user (marketing codes).
    Personal,
}

impl VoucherKind {
    /// Return the kind as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SingleUse => "single_use",
            Self::Personal => "personal",
        }
    }
}

impl fmt::Display for VoucherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A discount code.
///
/// Single-use vouchers flip `is_used` exactly once via a conditional
/// update; personal vouchers record per-user consumption in
/// `voucher_redemptions`. After consumption only the audit fields
/// (`used_by`, `used_at`) are ever written.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Voucher {
    /// Unique voucher identifier.
    pub id: Uuid,
    /// The code customers enter (unique).
    pub code: String,
    /// Consumption mode.
    pub kind: VoucherKind,
    /// Percentage discount (exclusive with `flat_amount`).
    pub discount_percent: Option<i32>,
    /// Flat discount amount (exclusive with `discount_percent`).
    pub flat_amount: Option<i64>,
    /// Minimum booking amount for the voucher to apply.
    pub minimum_amount: i64,
    /// Cap on the computed discount.
    pub maximum_discount: Option<i64>,
    /// Expiry; `None` means no expiry.
    pub valid_until: Option<DateTime<Utc>>,
    /// Whether a single-use voucher has been consumed.
    pub is_used: bool,
    /// Who consumed the voucher (single-use audit).
    pub used_by: Option<Uuid>,
    /// When the voucher was consumed (single-use audit).
    pub used_at: Option<DateTime<Utc>>,
    /// When the voucher was created.
    pub created_at: DateTime<Utc>,
}

impl Voucher {
    /// Check whether the voucher has expired at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.valid_until.is_some_and(|until| until <= now)
    }

    /// Validate the voucher against a booking amount.
    ///
    /// Checks run in order: expiry, prior consumption (single-use only;
    /// per-user consumption of personal vouchers is checked against the
    /// redemption table by the resolver), minimum amount.
    pub fn validate(&self, amount: i64, now: DateTime<Utc>) -> Result<(), VoucherRejection> {
        if self.is_expired(now) {
            return Err(VoucherRejection::Expired);
        }
        if self.kind == VoucherKind::SingleUse && self.is_used {
            return Err(VoucherRejection::AlreadyUsed);
        }
        if amount < self.minimum_amount {
            return Err(VoucherRejection::BelowMinimum);
        }
        Ok(())
    }

    /// Compute the discount for a booking amount.
    ///
    /// `min(amount × percent / 100, maximum_discount, amount)` for
    /// percentage vouchers; flat-amount vouchers are clamped the same
    /// way. Never negative.
    pub fn discount_for(&self, amount: i64) -> i64 {
        let raw = match (self.discount_percent, self.flat_amount) {
            (Some(percent), _) => amount * i64::from(percent) / 100,
            (None, Some(flat)) => flat,
            (None, None) => 0,
        };
        let capped = match self.maximum_discount {
            Some(max) => raw.min(max),
            None => raw,
        };
        capped.clamp(0, amount)
    }
}

/// Why a voucher was rejected during validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoucherRejection {
    /// No voucher exists for the supplied code.
    UnknownCode,
    /// The voucher expired before the booking.
    Expired,
    /// A single-use voucher was already consumed.
    AlreadyUsed,
    /// A personal voucher was already redeemed by this user.
    AlreadyRedeemed,
    /// The booking amount is below the voucher's minimum.
    BelowMinimum,
}

impl VoucherRejection {
    /// Return the rejection as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnknownCode => "unknown_code",
            Self::Expired => "expired",
            Self::AlreadyUsed => "already_used",
            Self::AlreadyRedeemed => "already_redeemed",
            Self::BelowMinimum => "below_minimum",
        }
    }
}

impl fmt::Display for VoucherRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A per-user redemption of a personal voucher.
///
/// The (voucher, user) pair is unique; insertion with conflict-skip is
/// the atomic claim for personal vouchers.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VoucherRedemption {
    /// The redeemed voucher.
    pub voucher_id: Uuid,
    /// The redeeming user.
    pub user_id: Uuid,
    /// The booking the redemption paid for.
    pub booking_id: Uuid,
    /// When the redemption happened.
    pub redeemed_at: DateTime<Utc>,
}

/// Data required to create a voucher (admin/marketing action).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewVoucher {
    /// The code customers will enter.
    pub code: String,
    /// Consumption mode.
    pub kind: VoucherKind,
    /// Percentage discount.
    pub discount_percent: Option<i32>,
    /// Flat discount amount.
    pub flat_amount: Option<i64>,
    /// Minimum booking amount.
    pub minimum_amount: i64,
    /// Cap on the computed discount.
    pub maximum_discount: Option<i64>,
    /// Expiry.
    pub valid_until: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn percent_voucher(percent: i32, maximum: Option<i64>) -> Voucher {
        Voucher {
            id: Uuid::new_v4(),
            code: "TREK20".to_string(),
            kind: VoucherKind::SingleUse,
            discount_percent: Some(percent),
            flat_amount: None,
            minimum_amount: 0,
            maximum_discount: maximum,
            valid_until: None,
            is_used: false,
            used_by: None,
            used_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_percent_discount_caps_at_maximum() {
        // 20% of 10500 would be 2100 but the cap wins.
        let voucher = percent_voucher(20, Some(1500));
        assert_eq!(voucher.discount_for(10500), 1500);
    }

    #[test]
    fn test_percent_discount_uncapped() {
        let voucher = percent_voucher(10, None);
        assert_eq!(voucher.discount_for(10500), 1050);
    }

    #[test]
    fn test_flat_discount_clamped_to_amount() {
        let mut voucher = percent_voucher(0, None);
        voucher.discount_percent = None;
        voucher.flat_amount = Some(5000);
        assert_eq!(voucher.discount_for(3000), 3000);
        assert_eq!(voucher.discount_for(8000), 5000);
    }

    #[test]
    fn test_validation_order_expiry_before_usage() {
        let mut voucher = percent_voucher(20, None);
        voucher.valid_until = Some(Utc::now() - Duration::hours(1));
        voucher.is_used = true;
        // Expired wins even though the voucher is also used.
        assert_eq!(
            voucher.validate(1000, Utc::now()),
            Err(VoucherRejection::Expired)
        );
    }

    #[test]
    fn test_used_single_use_rejected() {
        let mut voucher = percent_voucher(20, None);
        voucher.is_used = true;
        assert_eq!(
            voucher.validate(1000, Utc::now()),
            Err(VoucherRejection::AlreadyUsed)
        );
    }

    #[test]
    fn test_used_flag_ignored_for_personal() {
        let mut voucher = percent_voucher(20, None);
        voucher.kind = VoucherKind::Personal;
        voucher.is_used = true;
        assert_eq!(voucher.validate(1000, Utc::now()), Ok(()));
    }

    #[test]
    fn test_minimum_amount_enforced() {
        let mut voucher = percent_voucher(20, None);
        voucher.minimum_amount = 5000;
        assert_eq!(
            voucher.validate(4999, Utc::now()),
            Err(VoucherRejection::BelowMinimum)
        );
        assert_eq!(voucher.validate(5000, Utc::now()), Ok(()));
    }
}
