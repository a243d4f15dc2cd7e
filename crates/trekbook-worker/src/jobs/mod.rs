//! Built-in job handlers.

pub mod cleanup;
pub mod reconcile;
pub mod repair;

pub use cleanup::JobCleanupHandler;
pub use reconcile::{SlotArchiveHandler, SlotReconcileHandler};
pub use repair::ParticipantRepairHandler;
