//! # trekbook-service
//!
//! Business logic service layer for TrekBook. Each service orchestrates
//! the reservation store, repositories, and collaborator traits to
//! implement application-level use cases.
//!
//! Services follow constructor injection — all dependencies are provided
//! at construction time via `Arc` references.

pub mod booking;
pub mod context;
pub mod notification;
pub mod slot;
pub mod voucher;

pub use booking::{BookingAdminService, BookingQueryService, ReservationEngine};
pub use context::RequestContext;
pub use notification::TracingSink;
pub use slot::SlotService;
pub use voucher::{VoucherAdminService, VoucherResolver};
