//! SDK Error Types

use thiserror::Error;

/// SDK Result type
pub type Result<T> = std::result::Result<T, SdkError>;

/// Server error codes
pub mod code {
    pub const VALIDATION_ERROR: i32 = 4000;
    pub const NO_JOB_AVAILABLE: i32 = 4001;
    pub const JOB_NOT_AVAILABLE: i32 = 4002;
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const DB_ERROR: i32 = 5001;
    pub const STORE_UNAVAILABLE: i32 = 5002;
    pub const TRANSACTION_ERROR: i32 = 5003;
}

/// SDK Error
#[derive(Debug, Error)]
pub enum SdkError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("RPC error ({code}): {message}")]
    Rpc { code: i32, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl SdkError {
    /// Empty queue or a lost claim race; not a failure of the request
    pub fn is_contention(&self) -> bool {
        matches!(
            self,
            SdkError::Rpc {
                code: code::NO_JOB_AVAILABLE | code::JOB_NOT_AVAILABLE,
                ..
            }
        )
    }

    /// Server-side fault that left no partial state behind
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SdkError::Rpc {
                code: code::STORE_UNAVAILABLE | code::TRANSACTION_ERROR,
                ..
            }
        ) || matches!(self, SdkError::Transport(_))
    }

    pub fn rpc_code(&self) -> Option<i32> {
        match self {
            SdkError::Rpc { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl From<jsonrpsee::core::ClientError> for SdkError {
    fn from(e: jsonrpsee::core::ClientError) -> Self {
        match e {
            jsonrpsee::core::ClientError::Call(call_err) => SdkError::Rpc {
                code: call_err.code(),
                message: call_err.message().to_string(),
            },
            jsonrpsee::core::ClientError::Transport(e) => SdkError::Transport(e.to_string()),
            jsonrpsee::core::ClientError::RestartNeeded(_) => {
                SdkError::Connection("Connection restart needed".to_string())
            }
            jsonrpsee::core::ClientError::ParseError(e) => SdkError::Serialization(e),
            _ => SdkError::Other(e.to_string()),
        }
    }
}
