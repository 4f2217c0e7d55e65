//! RPC Error Types
//!
//! Maps application errors to JSON-RPC error codes. 4xxx codes are caller or
//! contention outcomes, 5xxx codes are faults.

use jobqueue_core::error::AppError;
use jsonrpsee::types::ErrorObjectOwned;
use tracing::{debug, warn};

/// RPC Error Codes
pub mod code {
    pub const VALIDATION_ERROR: i32 = 4000;
    pub const NO_JOB_AVAILABLE: i32 = 4001;
    pub const JOB_NOT_AVAILABLE: i32 = 4002;
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const DB_ERROR: i32 = 5001;
    pub const STORE_UNAVAILABLE: i32 = 5002;
    pub const TRANSACTION_ERROR: i32 = 5003;
}

/// Convert AppError to JSON-RPC ErrorObject
pub fn to_rpc_error(err: AppError) -> ErrorObjectOwned {
    if err.is_contention() {
        debug!(error = %err, "Contention outcome");
    } else if !matches!(err, AppError::Validation(_) | AppError::Domain(_)) {
        warn!(error = %err, "Request failed");
    }

    let code = match &err {
        AppError::Validation(_) | AppError::Domain(_) => code::VALIDATION_ERROR,
        AppError::NoJobAvailable => code::NO_JOB_AVAILABLE,
        AppError::JobNotAvailable(_) => code::JOB_NOT_AVAILABLE,
        AppError::StoreUnavailable(_) => code::STORE_UNAVAILABLE,
        AppError::Transaction(_) => code::TRANSACTION_ERROR,
        AppError::Database(_) => code::DB_ERROR,
        AppError::Config(_) | AppError::Internal(_) => code::INTERNAL_ERROR,
    };

    ErrorObjectOwned::owned(code, err.to_string(), None::<()>)
}
