//! Voucher creation (admin/marketing action).

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use trekbook_core::error::AppError;
use trekbook_core::result::AppResult;
use trekbook_database::repositories::VoucherRepository;
use trekbook_entity::voucher::model::{NewVoucher, Voucher, VoucherKind};

use crate::context::RequestContext;

/// Characters used for generated voucher codes. Ambiguous glyphs
/// (0/O, 1/I) are excluded.
const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
/// Length of generated voucher codes.
const CODE_LENGTH: usize = 10;

/// Parameters for creating a voucher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVoucherParams {
    /// Explicit code; generated when absent.
    pub code: Option<String>,
    /// Consumption mode.
    pub kind: VoucherKind,
    /// Percentage discount (exclusive with `flat_amount`).
    pub discount_percent: Option<i32>,
    /// Flat discount amount (exclusive with `discount_percent`).
    pub flat_amount: Option<i64>,
    /// Minimum booking amount.
    #[serde(default)]
    pub minimum_amount: i64,
    /// Cap on the computed discount.
    pub maximum_discount: Option<i64>,
    /// Expiry.
    pub valid_until: Option<DateTime<Utc>>,
}

/// Creates vouchers on behalf of marketing admins.
pub struct VoucherAdminService {
    /// Voucher repository.
    vouchers: Arc<VoucherRepository>,
}

impl VoucherAdminService {
    /// Creates a new voucher admin service.
    pub fn new(vouchers: Arc<VoucherRepository>) -> Self {
        Self { vouchers }
    }

    /// Create a voucher. Admin-only.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        params: CreateVoucherParams,
    ) -> AppResult<Voucher> {
        ctx.require_admin()?;

        match (params.discount_percent, params.flat_amount) {
            (Some(percent), None) if (1..=100).contains(&percent) => {}
            (None, Some(flat)) if flat > 0 => {}
            (Some(_), Some(_)) => {
                return Err(AppError::validation(
                    "A voucher has either a percentage or a flat amount, not both",
                ));
            }
            _ => {
                return Err(AppError::validation(
                    "A voucher needs a percentage in 1-100 or a positive flat amount",
                ));
            }
        }
        if params.minimum_amount < 0 {
            return Err(AppError::validation("Minimum amount cannot be negative"));
        }
        if params.maximum_discount.is_some_and(|max| max <= 0) {
            return Err(AppError::validation("Maximum discount must be positive"));
        }

        let code = match params.code {
            Some(code) => {
                let code = code.trim().to_uppercase();
                if code.len() < 4 {
                    return Err(AppError::validation(
                        "Voucher codes must be at least 4 characters",
                    ));
                }
                if self.vouchers.find_by_code(&code).await?.is_some() {
                    return Err(AppError::conflict(format!(
                        "Voucher code {code} already exists"
                    )));
                }
                code
            }
            None => generate_code(),
        };

        let voucher = self
            .vouchers
            .create(&NewVoucher {
                code,
                kind: params.kind,
                discount_percent: params.discount_percent,
                flat_amount: params.flat_amount,
                minimum_amount: params.minimum_amount,
                maximum_discount: params.maximum_discount,
                valid_until: params.valid_until,
            })
            .await?;

        info!(voucher_id = %voucher.id, code = %voucher.code, "Voucher created");

        Ok(voucher)
    }
}

/// Generate a random voucher code.
fn generate_code() -> String {
    let mut rng = rand::thread_rng();
    (0..CODE_LENGTH)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_codes_are_well_formed() {
        for _ in 0..20 {
            let code = generate_code();
            assert_eq!(code.len(), CODE_LENGTH);
            assert!(code.bytes().all(|b| CODE_ALPHABET.contains(&b)));
        }
    }
}
