//! SDK Response Types
//!
//! Mirrors the JSON-RPC types from the api-rpc crate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Available,
    Claimed,
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Available => f.write_str("available"),
            JobStatus::Claimed => f.write_str("claimed"),
        }
    }
}

/// Job as returned by the server
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Job {
    pub id: i64,
    pub status: JobStatus,
    pub payload: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListJobsResponse {
    pub jobs: Vec<Job>,
}
