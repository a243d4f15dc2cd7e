//! Departure slot entity.

pub mod model;
pub mod status;

pub use model::{NewSlot, Slot};
pub use status::SlotStatus;
