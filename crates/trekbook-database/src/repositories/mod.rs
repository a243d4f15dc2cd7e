//! Concrete repository implementations.

pub mod booking;
pub mod job;
pub mod slot;
pub mod trek;
pub mod voucher;

pub use booking::BookingRepository;
pub use job::JobRepository;
pub use slot::SlotRepository;
pub use trek::TrekRepository;
pub use voucher::VoucherRepository;
