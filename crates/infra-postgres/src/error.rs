// sqlx::Error -> AppError mapping

use jobqueue_core::error::AppError;

// Helper to convert sqlx::Error to AppError by failure class
pub(crate) fn map_sqlx_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) => {
            let message = db_err.message();
            // PostgreSQL SQLSTATE: https://www.postgresql.org/docs/current/errcodes-appendix.html
            match db_err.code().as_deref() {
                // check_violation, not_null_violation, invalid_text_representation
                Some(code @ ("23514" | "23502" | "22P02")) => {
                    AppError::Validation(format!("Constraint violation: {} ({})", message, code))
                }
                // serialization_failure, deadlock_detected, lock_not_available
                Some(code @ ("40001" | "40P01" | "55P03")) => {
                    AppError::Transaction(format!("{} ({})", message, code))
                }
                // connection_exception class, admin/crash shutdown, too_many_connections
                Some(code)
                    if code.starts_with("08")
                        || matches!(code, "57P01" | "57P02" | "57P03" | "53300") =>
                {
                    AppError::StoreUnavailable(format!("{} ({})", message, code))
                }
                Some(code) => AppError::Database(format!("Database error [{}]: {}", code, message)),
                None => AppError::Database(format!("Database error: {}", message)),
            }
        }
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => AppError::StoreUnavailable(err.to_string()),
        sqlx::Error::Configuration(_) => AppError::Config(err.to_string()),
        sqlx::Error::RowNotFound => AppError::Database("Row not found".to_string()),
        sqlx::Error::ColumnNotFound(col) => {
            AppError::Database(format!("Column not found: {}", col))
        }
        _ => AppError::Database(err.to_string()),
    }
}

/// Any commit failure is a transaction fault: the outcome of the
/// transaction is that nothing it did became visible.
pub(crate) fn map_commit_error(err: sqlx::Error) -> AppError {
    AppError::Transaction(format!("Failed to commit transaction: {}", err))
}
