//! Trek catalog entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A trek in the catalog.
///
/// The catalog itself (descriptions, itineraries, galleries) is managed
/// elsewhere; the booking core only needs the slug, the per-participant
/// base price, and whether the trek is bookable.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Trek {
    /// URL-safe unique identifier (e.g. `"annapurna-base-camp"`).
    pub slug: String,
    /// Display name.
    pub name: String,
    /// Base price per participant in whole currency units (INR).
    pub base_price: i64,
    /// Trek duration in days.
    pub duration_days: i32,
    /// Whether the trek currently accepts bookings.
    pub is_active: bool,
    /// When the trek was added to the catalog.
    pub created_at: DateTime<Utc>,
}
