//! Booking amount computation.
//!
//! All amounts are whole currency units (INR). GST is a flat 5% of the
//! base amount, rounded half-up.

use serde::{Deserialize, Serialize};

/// Flat GST rate applied to the base amount, in percent.
pub const GST_PERCENT: i64 = 5;

/// Compute the GST amount for a base amount (rounded half-up).
pub fn gst_on(base_amount: i64) -> i64 {
    (base_amount * GST_PERCENT + 50) / 100
}

/// The computed amounts for a booking.
///
/// Invariant: `total_amount == base_amount + gst_amount - discount_amount`
/// with `0 <= discount_amount <= base_amount + gst_amount`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingQuote {
    /// Trek price × participants.
    pub base_amount: i64,
    /// 5% GST on the base amount.
    pub gst_amount: i64,
    /// Voucher discount (zero when no voucher applied).
    pub discount_amount: i64,
    /// Amount payable.
    pub total_amount: i64,
}

impl PricingQuote {
    /// Quote for a base amount with no discount.
    pub fn for_base(base_amount: i64) -> Self {
        let gst_amount = gst_on(base_amount);
        Self {
            base_amount,
            gst_amount,
            discount_amount: 0,
            total_amount: base_amount + gst_amount,
        }
    }

    /// Amount payable before any discount.
    pub fn payable(&self) -> i64 {
        self.base_amount + self.gst_amount
    }

    /// Return a quote with the discount applied, clamped to
    /// `[0, base + gst]`.
    pub fn with_discount(self, discount: i64) -> Self {
        let discount_amount = discount.clamp(0, self.payable());
        Self {
            discount_amount,
            total_amount: self.payable() - discount_amount,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gst_rounds_half_up() {
        assert_eq!(gst_on(10000), 500);
        assert_eq!(gst_on(1010), 51); // 50.5 rounds up
        assert_eq!(gst_on(1009), 50); // 50.45 rounds down
        assert_eq!(gst_on(0), 0);
    }

    #[test]
    fn test_quote_without_discount() {
        let quote = PricingQuote::for_base(10000);
        assert_eq!(quote.gst_amount, 500);
        assert_eq!(quote.total_amount, 10500);
        assert_eq!(quote.discount_amount, 0);
    }

    #[test]
    fn test_discount_clamped_to_payable() {
        let quote = PricingQuote::for_base(1000).with_discount(5000);
        assert_eq!(quote.discount_amount, 1050);
        assert_eq!(quote.total_amount, 0);
    }

    #[test]
    fn test_negative_discount_ignored() {
        let quote = PricingQuote::for_base(1000).with_discount(-10);
        assert_eq!(quote.discount_amount, 0);
        assert_eq!(quote.total_amount, 1050);
    }

    #[test]
    fn test_total_invariant_holds() {
        for base in [1, 999, 10000, 123456] {
            for discount in [0, 50, 100000] {
                let q = PricingQuote::for_base(base).with_discount(discount);
                assert_eq!(q.total_amount, q.base_amount + q.gst_amount - q.discount_amount);
                assert!(q.discount_amount >= 0);
                assert!(q.discount_amount <= q.base_amount + q.gst_amount);
            }
        }
    }
}
