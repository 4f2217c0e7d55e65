// Create Use Case

use crate::domain::{Job, JobStatus};
use crate::error::{AppError, Result};
use crate::port::JobStore;
use serde::{Deserialize, Serialize};

/// Largest accepted payload, in bytes
pub const MAX_PAYLOAD_BYTES: usize = 1024 * 1024;

/// Create request as received from a producer
///
/// Both fields are optional on the wire so that a missing payload is
/// reported as a validation fault instead of a decoding failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateJobRequest {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub payload: Option<String>,
}

impl CreateJobRequest {
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            status: None,
            payload: Some(payload.into()),
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }
}

/// Validate a create request into (status, payload)
///
/// Runs before any store call.
pub fn validate_request(req: CreateJobRequest) -> Result<(JobStatus, String)> {
    let payload = req
        .payload
        .ok_or_else(|| AppError::Validation("payload is required".to_string()))?;

    if payload.len() > MAX_PAYLOAD_BYTES {
        return Err(AppError::Validation(format!(
            "payload too large: {} bytes (max {})",
            payload.len(),
            MAX_PAYLOAD_BYTES
        )));
    }

    let status = match req.status.as_deref() {
        None => JobStatus::default(),
        Some(s) => s
            .parse::<JobStatus>()
            .map_err(|e| AppError::Validation(e.to_string()))?,
    };

    Ok((status, payload))
}

/// Execute create use case
pub async fn execute(store: &dyn JobStore, req: CreateJobRequest) -> Result<Job> {
    let (status, payload) = validate_request(req)?;
    store.insert(status, &payload).await
}
