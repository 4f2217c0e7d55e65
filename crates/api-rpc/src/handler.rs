//! RPC Method Handlers
//!
//! Thin adapters between wire types and the queue service.

use crate::error::to_rpc_error;
use crate::types::{ClaimByIdParams, CreateJobParams, JobResponse, ListJobsResponse};
use jobqueue_core::application::{CreateJobRequest, QueueService};
use jsonrpsee::types::ErrorObjectOwned;

/// RPC Handler with injected queue service
pub struct RpcHandler {
    service: QueueService,
}

impl RpcHandler {
    pub fn new(service: QueueService) -> Self {
        Self { service }
    }

    /// jobs.create.v1
    pub async fn create(&self, params: CreateJobParams) -> Result<JobResponse, ErrorObjectOwned> {
        let req = CreateJobRequest {
            status: params.status,
            payload: params.payload,
        };

        let job = self.service.create(req).await.map_err(to_rpc_error)?;
        Ok(job.into())
    }

    /// jobs.list.v1
    pub async fn list(&self) -> Result<ListJobsResponse, ErrorObjectOwned> {
        let jobs = self.service.list().await.map_err(to_rpc_error)?;
        Ok(ListJobsResponse {
            jobs: jobs.into_iter().map(JobResponse::from).collect(),
        })
    }

    /// jobs.claim.v1
    pub async fn claim(&self) -> Result<JobResponse, ErrorObjectOwned> {
        let job = self.service.claim_any().await.map_err(to_rpc_error)?;
        Ok(job.into())
    }

    /// jobs.claim_by_id.v1
    pub async fn claim_by_id(
        &self,
        params: ClaimByIdParams,
    ) -> Result<JobResponse, ErrorObjectOwned> {
        let job = self
            .service
            .claim_by_id(params.id)
            .await
            .map_err(to_rpc_error)?;
        Ok(job.into())
    }
}
