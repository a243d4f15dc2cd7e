//! Traits for external collaborators consumed by the booking core.

pub mod notification;
pub mod price_lookup;

pub use notification::NotificationSink;
pub use price_lookup::PriceLookup;
