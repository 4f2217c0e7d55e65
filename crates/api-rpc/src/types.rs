//! RPC Request/Response Types

use chrono::{DateTime, Utc};
use jobqueue_core::domain::{Job, JobId, JobStatus};
use serde::{Deserialize, Serialize};

/// jobs.create.v1 - Create a job
///
/// Fields stay optional here; the queue service reports what is missing.
#[derive(Debug, Default, Deserialize)]
pub struct CreateJobParams {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub payload: Option<String>,
}

/// jobs.claim_by_id.v1 - Claim one job by id
#[derive(Debug, Deserialize)]
pub struct ClaimByIdParams {
    pub id: JobId,
}

/// Job as returned by every method
#[derive(Debug, Clone, Serialize)]
pub struct JobResponse {
    pub id: JobId,
    pub status: JobStatus,
    pub payload: String,
    pub timestamp: DateTime<Utc>,
}

impl From<Job> for JobResponse {
    fn from(job: Job) -> Self {
        Self {
            id: job.id,
            status: job.status,
            payload: job.payload,
            timestamp: job.timestamp,
        }
    }
}

/// jobs.list.v1
#[derive(Debug, Clone, Serialize)]
pub struct ListJobsResponse {
    pub jobs: Vec<JobResponse>,
}
