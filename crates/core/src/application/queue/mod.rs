// Queue Service - create, list and claim use cases

pub mod claim;
pub mod create;

pub use create::CreateJobRequest;

use crate::domain::{Job, JobId};
use crate::error::{AppError, Result};
use crate::port::JobStore;
use std::sync::Arc;
use tracing::{debug, info};

/// Queue Service
///
/// Stateless between calls; all shared state lives in the injected store, so
/// any number of instances may run against one store.
#[derive(Clone)]
pub struct QueueService {
    store: Arc<dyn JobStore>,
}

impl QueueService {
    pub fn new(store: Arc<dyn JobStore>) -> Self {
        Self { store }
    }

    /// Create a new job (status defaults to available)
    pub async fn create(&self, req: CreateJobRequest) -> Result<Job> {
        let job = create::execute(self.store.as_ref(), req).await?;
        info!(job_id = job.id, status = %job.status, "Job created");
        Ok(job)
    }

    /// All jobs ordered by id ascending
    pub async fn list(&self) -> Result<Vec<Job>> {
        self.store.scan_all().await
    }

    /// Claim the lowest-id available job
    ///
    /// # Errors
    /// - `AppError::NoJobAvailable` when nothing is claimable (not a fault)
    /// - `AppError::Transaction` / `AppError::StoreUnavailable` on store faults
    pub async fn claim_any(&self) -> Result<Job> {
        let job = claim::claim_any(self.store.as_ref())
            .await?
            .ok_or(AppError::NoJobAvailable)?;
        info!(job_id = job.id, "Claimed next available job");
        Ok(job)
    }

    /// Claim a specific job
    ///
    /// # Errors
    /// - `AppError::JobNotAvailable` when the job is missing or already claimed
    /// - `AppError::Transaction` / `AppError::StoreUnavailable` on store faults
    pub async fn claim_by_id(&self, id: JobId) -> Result<Job> {
        match claim::claim_by_id(self.store.as_ref(), id).await? {
            Some(job) => {
                info!(job_id = job.id, "Claimed job by id");
                Ok(job)
            }
            None => {
                debug!(job_id = id, "Claim by id lost or target missing");
                Err(AppError::JobNotAvailable(id))
            }
        }
    }
}
