//! Job queue abstraction for enqueuing and dequeuing background jobs.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing;

use trekbook_core::error::AppError;
use trekbook_core::types::id::JobId;
use trekbook_database::repositories::JobRepository;
use trekbook_entity::job::model::{CreateJob, Job};
use trekbook_entity::job::status::JobPriority;

/// Parameters for creating a new job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobCreateParams {
    /// Type of job (e.g., "slot_reconcile", "participant_repair")
    pub job_type: String,
    /// Queue name (e.g., "default", "maintenance")
    pub queue: String,
    /// Priority level
    pub priority: JobPriority,
    /// Job payload as JSON
    pub payload: serde_json::Value,
    /// Maximum retry attempts
    pub max_attempts: i32,
    /// Optional scheduled time (run after this time)
    pub scheduled_at: Option<DateTime<Utc>>,
}

/// Job queue for enqueuing and dequeuing work
#[derive(Debug, Clone)]
pub struct JobQueue {
    /// Job repository for database persistence
    repo: Arc<JobRepository>,
    /// Worker identifier for claiming jobs
    worker_id: String,
}

impl JobQueue {
    /// Create a new job queue
    pub fn new(repo: Arc<JobRepository>, worker_id: String) -> Self {
        Self { repo, worker_id }
    }

    /// Enqueue a new job
    pub async fn enqueue(&self, params: JobCreateParams) -> Result<Job, AppError> {
        let job = self
            .repo
            .create(&CreateJob {
                job_type: params.job_type,
                queue: params.queue,
                priority: params.priority,
                payload: params.payload,
                max_attempts: params.max_attempts,
                scheduled_at: params.scheduled_at,
            })
            .await?;

        tracing::debug!(
            "Enqueued job: id={}, type='{}', queue='{}', priority={}",
            job.id,
            job.job_type,
            job.queue,
            job.priority
        );

        Ok(job)
    }

    /// Dequeue the next available job from specified queues
    pub async fn dequeue(&self, queues: &[&str]) -> Result<Option<Job>, AppError> {
        for queue in queues {
            let job = self.repo.claim_next(queue, &self.worker_id).await?;

            if let Some(job) = job {
                tracing::debug!(
                    "Dequeued job: id={}, type='{}', queue='{}'",
                    job.id,
                    job.job_type,
                    job.queue
                );
                return Ok(Some(job));
            }
        }

        Ok(None)
    }

    /// Mark a job as completed successfully
    pub async fn complete(
        &self,
        job_id: JobId,
        result: Option<serde_json::Value>,
    ) -> Result<(), AppError> {
        self.repo.complete(job_id.into_uuid(), result.as_ref()).await?;
        tracing::debug!("Job completed: id={}", job_id);
        Ok(())
    }

    /// Mark a job as failed
    pub async fn fail(&self, job_id: JobId, error: &str) -> Result<(), AppError> {
        self.repo.fail(job_id.into_uuid(), error).await?;
        tracing::debug!("Job failed: id={}, error='{}'", job_id, error);
        Ok(())
    }

    /// Retry a failed job
    pub async fn retry(&self, job_id: JobId) -> Result<(), AppError> {
        self.repo.retry(job_id.into_uuid()).await?;
        tracing::debug!("Job retried: id={}", job_id);
        Ok(())
    }
}
