//! Cron scheduler for periodic maintenance tasks.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing;

use trekbook_core::error::AppError;
use trekbook_entity::job::status::JobPriority;

use crate::queue::{JobCreateParams, JobQueue};

/// Cron-based scheduler for periodic background tasks
pub struct CronScheduler {
    /// The underlying job scheduler
    scheduler: JobScheduler,
    /// Job queue for enqueuing scheduled work
    queue: Arc<JobQueue>,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler").finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler
    pub async fn new(queue: Arc<JobQueue>) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {}", e)))?;

        Ok(Self { scheduler, queue })
    }

    /// Register all default scheduled tasks
    pub async fn register_default_tasks(&self) -> Result<(), AppError> {
        // Slot reconcile sweep — every 5 minutes. The admission path
        // keeps tallies correct on its own; the sweep repairs drift from
        // manual edits and abandoned requests.
        self.register("0 */5 * * * *", "slot_reconcile", JobPriority::High, 1)
            .await?;
        // Participant record repair flagging — hourly.
        self.register("0 10 * * * *", "participant_repair", JobPriority::Normal, 1)
            .await?;
        // Archive departed slots — daily at 2 AM.
        self.register("0 0 2 * * *", "slot_archive", JobPriority::Normal, 3)
            .await?;
        // Purge old terminal jobs — daily at 4 AM.
        self.register("0 30 4 * * *", "job_cleanup", JobPriority::Low, 1)
            .await?;

        tracing::info!("All scheduled tasks registered");
        Ok(())
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {}", e)))?;

        tracing::info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {}", e)))?;

        tracing::info!("Cron scheduler shut down");
        Ok(())
    }

    /// Register one cron schedule that enqueues a maintenance job.
    async fn register(
        &self,
        schedule: &str,
        job_type: &'static str,
        priority: JobPriority,
        max_attempts: i32,
    ) -> Result<(), AppError> {
        let queue = Arc::clone(&self.queue);
        let job = CronJob::new_async(schedule, move |_uuid, _lock| {
            let queue = Arc::clone(&queue);
            Box::pin(async move {
                tracing::debug!("Scheduling {} job", job_type);
                let params = JobCreateParams {
                    job_type: job_type.to_string(),
                    queue: "maintenance".to_string(),
                    priority,
                    payload: serde_json::json!({}),
                    max_attempts,
                    scheduled_at: None,
                };
                if let Err(e) = queue.enqueue(params).await {
                    tracing::error!("Failed to enqueue {}: {}", job_type, e);
                }
            })
        })
        .map_err(|e| {
            AppError::internal(format!("Failed to create {} schedule: {}", job_type, e))
        })?;

        self.scheduler.add(job).await.map_err(|e| {
            AppError::internal(format!("Failed to add {} schedule: {}", job_type, e))
        })?;

        tracing::info!("Registered schedule: {} ({})", job_type, schedule);
        Ok(())
    }
}
