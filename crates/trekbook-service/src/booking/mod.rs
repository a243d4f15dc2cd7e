//! Booking services: creation, admin lifecycle, queries.

pub mod admin;
pub mod engine;
pub mod queries;

pub use admin::BookingAdminService;
pub use engine::{BookingConfirmation, CreateBookingRequest, ReservationEngine};
pub use queries::BookingQueryService;
