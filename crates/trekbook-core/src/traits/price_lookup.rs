//! Trek price lookup collaborator boundary.

use async_trait::async_trait;

use crate::result::AppResult;

/// Supplies the configured base price per participant for a trek.
///
/// Pricing is owned by the catalog; the booking core only consumes the
/// per-participant base price. Amounts are whole currency units (INR).
#[async_trait]
pub trait PriceLookup: Send + Sync + 'static {
    /// Return the base price per participant for the given trek, or
    /// `None` if the trek is unknown or inactive.
    async fn base_price(&self, trek_slug: &str) -> AppResult<Option<i64>>;
}
