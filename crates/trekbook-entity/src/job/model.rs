//! Job entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::{JobPriority, JobStatus};

/// A background job.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Job {
    /// Unique job identifier.
    pub id: Uuid,
    /// Job type identifier (e.g., `"slot_reconcile"`).
    pub job_type: String,
    /// Queue name.
    pub queue: String,
    /// Job priority.
    pub priority: JobPriority,
    /// Job-specific payload (JSON).
    pub payload: serde_json::Value,
    /// Result data on completion (JSON).
    pub result: Option<serde_json::Value>,
    /// Error message on failure.
    pub error_message: Option<String>,
    /// Current job status.
    pub status: JobStatus,
    /// Number of execution attempts.
    pub attempts: i32,
    /// Maximum allowed attempts.
    pub max_attempts: i32,
    /// Scheduled execution time (None = immediate).
    pub scheduled_at: Option<DateTime<Utc>>,
    /// When the job started executing.
    pub started_at: Option<DateTime<Utc>>,
    /// When the job completed.
    pub completed_at: Option<DateTime<Utc>>,
    /// Worker ID that picked up the job.
    pub worker_id: Option<String>,
    /// When the job was created.
    pub created_at: DateTime<Utc>,
    /// When the job was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Check if the job can be retried.
    pub fn can_retry(&self) -> bool {
        self.status.can_retry() && self.attempts < self.max_attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_retry_respects_attempt_budget() {
        let now = Utc::now();
        let mut job = Job {
            id: Uuid::new_v4(),
            job_type: "slot_reconcile".to_string(),
            queue: "maintenance".to_string(),
            priority: JobPriority::Normal,
            payload: serde_json::json!({}),
            result: None,
            error_message: Some("timeout".to_string()),
            status: JobStatus::Failed,
            attempts: 1,
            max_attempts: 3,
            scheduled_at: None,
            started_at: Some(now),
            completed_at: None,
            worker_id: None,
            created_at: now,
            updated_at: now,
        };
        assert!(job.can_retry());

        job.attempts = 3;
        assert!(!job.can_retry());

        job.attempts = 1;
        job.status = JobStatus::Completed;
        assert!(!job.can_retry());
    }
}

/// Data required to create a new job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateJob {
    /// Job type identifier.
    pub job_type: String,
    /// Queue name.
    pub queue: String,
    /// Priority.
    pub priority: JobPriority,
    /// Job-specific payload.
    pub payload: serde_json::Value,
    /// Maximum retry attempts.
    pub max_attempts: i32,
    /// Scheduled execution time.
    pub scheduled_at: Option<DateTime<Utc>>,
}
