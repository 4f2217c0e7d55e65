// Central Error Type for the Application

use crate::domain::JobId;
use thiserror::Error;

/// Application-level error type
///
/// `NoJobAvailable` and `JobNotAvailable` are contention outcomes (empty queue,
/// lost race), not faults. Boundaries must keep them distinguishable.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Domain error: {0}")]
    Domain(#[from] crate::domain::DomainError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("No available jobs")]
    NoJobAvailable,

    #[error("Job {0} not found or not available")]
    JobNotAvailable(JobId),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Transaction error: {0}")]
    Transaction(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Expected outcome of an empty queue or a lost race
    pub fn is_contention(&self) -> bool {
        matches!(self, AppError::NoJobAvailable | AppError::JobNotAvailable(_))
    }

    /// Store-side fault that left no partial state behind
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AppError::StoreUnavailable(_) | AppError::Transaction(_)
        )
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

// Note: sqlx::Error conversion is handled in infra-postgres
// by mapping to AppError by error kind and SQLSTATE
