//! Old job cleanup.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::Value;
use tracing;

use trekbook_database::repositories::JobRepository;
use trekbook_entity::job::model::Job;

use crate::executor::{JobExecutionError, JobHandler};

/// Days to keep terminal job rows before purging.
const JOB_RETENTION_DAYS: i64 = 30;

/// Purges terminal jobs older than the retention window.
#[derive(Debug)]
pub struct JobCleanupHandler {
    /// Job repository.
    jobs: Arc<JobRepository>,
}

impl JobCleanupHandler {
    /// Create a new cleanup handler.
    pub fn new(jobs: Arc<JobRepository>) -> Self {
        Self { jobs }
    }
}

#[async_trait]
impl JobHandler for JobCleanupHandler {
    fn job_type(&self) -> &str {
        "job_cleanup"
    }

    async fn execute(&self, _job: &Job) -> Result<Option<Value>, JobExecutionError> {
        let cutoff = Utc::now() - Duration::days(JOB_RETENTION_DAYS);
        let purged = self
            .jobs
            .cleanup_old(cutoff)
            .await
            .map_err(|e| JobExecutionError::Transient(format!("Job cleanup failed: {}", e)))?;

        tracing::info!(purged, "Old jobs purged");

        Ok(Some(serde_json::json!({ "purged": purged })))
    }
}
