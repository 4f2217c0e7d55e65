// Job Domain Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::domain::error::{DomainError, Result};

/// Job ID (store-assigned, monotonically increasing)
pub type JobId = i64;

/// Job Status
///
/// Closed set. A job moves from `Available` to `Claimed` exactly once and
/// never back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Available,
    Claimed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Available => "available",
            JobStatus::Claimed => "claimed",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "available" => Ok(JobStatus::Available),
            "claimed" => Ok(JobStatus::Claimed),
            _ => Err(DomainError::InvalidStatus(s.to_string())),
        }
    }
}

/// Job Entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub status: JobStatus,
    /// Opaque, creator-supplied, never modified after insert
    pub payload: String,
    /// Creation time, assigned by the store
    pub timestamp: DateTime<Utc>,
}

impl Job {
    pub fn new(
        id: JobId,
        status: JobStatus,
        payload: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            status,
            payload: payload.into(),
            timestamp,
        }
    }

    pub fn is_available(&self) -> bool {
        self.status == JobStatus::Available
    }

    /// Transition to Claimed
    ///
    /// Only the in-memory value changes; persisting the transition is the
    /// claim protocol's job.
    pub fn claim(&mut self) -> Result<()> {
        if self.status != JobStatus::Available {
            return Err(DomainError::InvalidStateTransition {
                from: self.status.to_string(),
                to: JobStatus::Claimed.to_string(),
            });
        }
        self.status = JobStatus::Claimed;
        Ok(())
    }
}
