//! JobQueue Client Implementation

use crate::error::{Result, SdkError};
use crate::types::{Job, JobStatus, ListJobsResponse};
use jsonrpsee::core::client::ClientT;
use jsonrpsee::core::params::ObjectParams;
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use jsonrpsee::rpc_params;
use std::time::Duration;

/// Job queue client
///
/// # Example
///
/// ```no_run
/// use jobqueue_sdk::JobQueueClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = JobQueueClient::connect("http://127.0.0.1:8080").await?;
/// for job in client.list_jobs().await? {
///     println!("{} {}", job.id, job.status);
/// }
/// # Ok(())
/// # }
/// ```
pub struct JobQueueClient {
    client: HttpClient,
}

impl JobQueueClient {
    /// Connect to the job queue server
    ///
    /// # Arguments
    ///
    /// * `url` - RPC endpoint URL (e.g., `http://127.0.0.1:8080`)
    pub async fn connect(url: impl AsRef<str>) -> Result<Self> {
        let url = url.as_ref();

        let client = HttpClientBuilder::default()
            .request_timeout(Duration::from_secs(30))
            .build(url)
            .map_err(|e| SdkError::Connection(format!("Failed to create client: {}", e)))?;

        Ok(Self { client })
    }

    /// Create a job; `status` defaults to available on the server
    pub async fn create_job(
        &self,
        payload: impl Into<String>,
        status: Option<JobStatus>,
    ) -> Result<Job> {
        let mut params = ObjectParams::new();
        params.insert("payload", payload.into())?;
        if let Some(status) = status {
            params.insert("status", status)?;
        }

        let job: Job = self.client.request("jobs.create.v1", params).await?;
        Ok(job)
    }

    /// All jobs ordered by id
    pub async fn list_jobs(&self) -> Result<Vec<Job>> {
        let response: ListJobsResponse = self.client.request("jobs.list.v1", rpc_params![]).await?;
        Ok(response.jobs)
    }

    /// Claim the oldest available job
    ///
    /// An empty queue is reported as an error whose
    /// [`SdkError::is_contention`] returns true.
    pub async fn claim(&self) -> Result<Job> {
        let job: Job = self.client.request("jobs.claim.v1", rpc_params![]).await?;
        Ok(job)
    }

    /// Claim a specific job
    ///
    /// A missing or already claimed job is reported as a contention error.
    pub async fn claim_by_id(&self, id: i64) -> Result<Job> {
        let mut params = ObjectParams::new();
        params.insert("id", id)?;

        let job: Job = self.client.request("jobs.claim_by_id.v1", params).await?;
        Ok(job)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_rejects_invalid_url() {
        let err = JobQueueClient::connect("not a url").await.err().unwrap();
        assert!(matches!(err, SdkError::Connection(_)));
    }
}
