//! Trek catalog repository and price lookup.

use async_trait::async_trait;
use sqlx::PgPool;

use trekbook_core::error::{AppError, ErrorKind};
use trekbook_core::result::AppResult;
use trekbook_core::traits::PriceLookup;
use trekbook_entity::trek::Trek;

/// Repository for reading the trek catalog.
///
/// The catalog is maintained by an external admin tool; the booking core
/// only reads it, primarily for price lookup and slot scheduling checks.
#[derive(Debug, Clone)]
pub struct TrekRepository {
    pool: PgPool,
}

impl TrekRepository {
    /// Create a new trek repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an active trek by slug.
    pub async fn find_active_by_slug(&self, slug: &str) -> AppResult<Option<Trek>> {
        sqlx::query_as::<_, Trek>("SELECT * FROM treks WHERE slug = $1 AND is_active = TRUE")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find trek", e))
    }
}

#[async_trait]
impl PriceLookup for TrekRepository {
    async fn base_price(&self, trek_slug: &str) -> AppResult<Option<i64>> {
        Ok(self
            .find_active_by_slug(trek_slug)
            .await?
            .map(|trek| trek.base_price))
    }
}
