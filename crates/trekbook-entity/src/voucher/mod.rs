//! Voucher entity.

pub mod model;

pub use model::{NewVoucher, Voucher, VoucherKind, VoucherRedemption, VoucherRejection};
