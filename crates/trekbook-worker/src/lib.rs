//! Background job processing and scheduled maintenance for TrekBook.
//!
//! This crate provides:
//! - A worker runner that polls for and executes queued jobs
//! - A cron scheduler that enqueues the periodic maintenance sweeps
//! - A job executor that dispatches jobs to the correct handler
//! - Built-in jobs: slot reconciliation, departed-slot archival,
//!   participant-record repair flagging, and old-job cleanup

pub mod executor;
pub mod jobs;
pub mod queue;
pub mod runner;
pub mod scheduler;

pub use runner::WorkerRunner;
pub use scheduler::CronScheduler;
