//! Voucher validation, discount computation, and atomic consumption.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use trekbook_core::error::AppError;
use trekbook_core::result::AppResult;
use trekbook_database::store::ReservationStore;
use trekbook_entity::voucher::model::{Voucher, VoucherKind, VoucherRejection};

/// The result of resolving a voucher against a booking amount.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoucherApplication {
    /// The resolved voucher.
    pub voucher_id: Uuid,
    /// Discount granted.
    pub discount_amount: i64,
    /// Amount payable after the discount.
    pub final_amount: i64,
}

/// Validates voucher codes and consumes them atomically.
pub struct VoucherResolver {
    /// Reservation store.
    store: Arc<dyn ReservationStore>,
}

impl VoucherResolver {
    /// Creates a new voucher resolver.
    pub fn new(store: Arc<dyn ReservationStore>) -> Self {
        Self { store }
    }

    /// Evaluate a voucher without consuming it (preview).
    ///
    /// Validation order: code exists, not expired, not already used
    /// (single-use) or not already redeemed by this user (personal),
    /// amount meets the minimum. The discount is
    /// `min(amount × percent / 100, maximum_discount, amount)`.
    pub async fn evaluate(
        &self,
        code: &str,
        amount: i64,
        user_id: Uuid,
    ) -> AppResult<VoucherApplication> {
        self.resolve(code, amount, user_id).await.map(|(_, app)| app)
    }

    /// Evaluate and consume a voucher for a booking.
    ///
    /// Consumption is a conditional write: exactly one booking can win a
    /// single-use voucher, and each user can redeem a personal voucher
    /// once. A lost claim fails with `VoucherConsumed`; the voucher and
    /// the booking amounts are untouched in that case.
    pub async fn apply(
        &self,
        code: &str,
        amount: i64,
        user_id: Uuid,
        booking_id: Uuid,
    ) -> AppResult<VoucherApplication> {
        let (voucher, application) = self.resolve(code, amount, user_id).await?;

        let claimed = self
            .store
            .apply_discount(
                booking_id.into(),
                &voucher,
                user_id.into(),
                application.discount_amount,
            )
            .await?;

        if !claimed {
            return Err(AppError::voucher_consumed(format!(
                "Voucher {code} was claimed by a concurrent booking"
            )));
        }

        info!(
            %booking_id,
            voucher_id = %voucher.id,
            discount = application.discount_amount,
            "Voucher consumed"
        );

        Ok(application)
    }

    async fn resolve(
        &self,
        code: &str,
        amount: i64,
        user_id: Uuid,
    ) -> AppResult<(Voucher, VoucherApplication)> {
        let Some(voucher) = self.store.find_voucher(code).await? else {
            return Err(rejected(VoucherRejection::UnknownCode));
        };

        voucher.validate(amount, Utc::now()).map_err(rejected)?;

        if voucher.kind == VoucherKind::Personal
            && self
                .store
                .user_redeemed(voucher.id.into(), user_id.into())
                .await?
        {
            return Err(rejected(VoucherRejection::AlreadyRedeemed));
        }

        let discount_amount = voucher.discount_for(amount);
        let application = VoucherApplication {
            voucher_id: voucher.id,
            discount_amount,
            final_amount: amount - discount_amount,
        };
        Ok((voucher, application))
    }
}

fn rejected(rejection: VoucherRejection) -> AppError {
    AppError::voucher_invalid(format!("Voucher rejected: {rejection}"))
}
