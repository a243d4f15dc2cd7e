//! Application state shared across all handlers.

use std::sync::Arc;

use trekbook_core::config::AppConfig;
use trekbook_database::DatabasePool;
use trekbook_service::booking::{BookingAdminService, BookingQueryService, ReservationEngine};
use trekbook_service::slot::SlotService;
use trekbook_service::voucher::{VoucherAdminService, VoucherResolver};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Database pool (health checks).
    pub db: DatabasePool,
    /// Reservation engine (booking creation).
    pub engine: Arc<ReservationEngine>,
    /// Admin booking lifecycle.
    pub booking_admin: Arc<BookingAdminService>,
    /// Booking read paths.
    pub booking_queries: Arc<BookingQueryService>,
    /// Slot scheduling and availability.
    pub slots: Arc<SlotService>,
    /// Voucher evaluation.
    pub voucher_resolver: Arc<VoucherResolver>,
    /// Voucher creation.
    pub voucher_admin: Arc<VoucherAdminService>,
}
