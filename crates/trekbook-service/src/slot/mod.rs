//! Slot scheduling and maintenance.

pub mod service;

pub use service::SlotService;
