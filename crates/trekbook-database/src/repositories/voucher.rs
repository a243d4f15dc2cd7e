//! Voucher repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use trekbook_core::error::{AppError, ErrorKind};
use trekbook_core::result::AppResult;
use trekbook_entity::voucher::model::{NewVoucher, Voucher};

/// Repository for voucher lookup and creation.
///
/// Consumption of a voucher is deliberately *not* here: it must commit
/// atomically with the booking's amount update, so it lives in the
/// reservation store's `apply_discount` transaction.
#[derive(Debug, Clone)]
pub struct VoucherRepository {
    pool: PgPool,
}

impl VoucherRepository {
    /// Create a new voucher repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a voucher by code.
    pub async fn find_by_code(&self, code: &str) -> AppResult<Option<Voucher>> {
        sqlx::query_as::<_, Voucher>("SELECT * FROM vouchers WHERE code = $1")
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find voucher", e))
    }

    /// Create a new voucher (admin/marketing action).
    pub async fn create(&self, data: &NewVoucher) -> AppResult<Voucher> {
        sqlx::query_as::<_, Voucher>(
            "INSERT INTO vouchers \
             (code, kind, discount_percent, flat_amount, minimum_amount, maximum_discount, valid_until) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(&data.code)
        .bind(data.kind)
        .bind(data.discount_percent)
        .bind(data.flat_amount)
        .bind(data.minimum_amount)
        .bind(data.maximum_discount)
        .bind(data.valid_until)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create voucher", e))
    }

    /// Check whether a user has already redeemed a personal voucher.
    pub async fn has_redemption(&self, voucher_id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM voucher_redemptions WHERE voucher_id = $1 AND user_id = $2",
        )
        .bind(voucher_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to check voucher redemption", e)
        })?;
        Ok(count > 0)
    }
}
