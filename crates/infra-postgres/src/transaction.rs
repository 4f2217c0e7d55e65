// PostgreSQL Transaction Implementation

use crate::error::{map_commit_error, map_sqlx_error};
use crate::job_store::JobRow;
use async_trait::async_trait;
use jobqueue_core::domain::{Job, JobId, JobStatus};
use jobqueue_core::error::{AppError, Result};
use jobqueue_core::port::{JobStoreTransaction, Transaction};
use sqlx::{Postgres, Transaction as SqlxTransaction};

// The status literal is inlined, not bound, so the planner can match the
// partial index idx_job_queue_available under a generic plan
const LOCK_ONE_AVAILABLE: &str = r#"
    SELECT id, status, payload, timestamp
    FROM job_queue
    WHERE status = 'available'
    ORDER BY id ASC
    LIMIT 1
    FOR UPDATE SKIP LOCKED
"#;

const LOCK_AVAILABLE_BY_ID: &str = r#"
    SELECT id, status, payload, timestamp
    FROM job_queue
    WHERE id = $1 AND status = 'available'
    FOR UPDATE
"#;

/// Open transaction on one pooled connection
///
/// sqlx issues ROLLBACK when the inner transaction is dropped uncommitted.
pub struct PgJobTransaction {
    tx: SqlxTransaction<'static, Postgres>,
}

impl PgJobTransaction {
    pub fn new(tx: SqlxTransaction<'static, Postgres>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl Transaction for PgJobTransaction {
    async fn commit(self: Box<Self>) -> Result<()> {
        self.tx.commit().await.map_err(map_commit_error)
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        self.tx.rollback().await.map_err(map_sqlx_error)
    }
}

#[async_trait]
impl JobStoreTransaction for PgJobTransaction {
    async fn lock_one_available(&mut self) -> Result<Option<Job>> {
        let row = sqlx::query_as::<_, JobRow>(LOCK_ONE_AVAILABLE)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        row.map(JobRow::into_job).transpose()
    }

    async fn lock_available_by_id(&mut self, id: JobId) -> Result<Option<Job>> {
        // Waits on a row locked elsewhere; once released, PostgreSQL re-checks
        // the WHERE clause against the committed row version
        let row = sqlx::query_as::<_, JobRow>(LOCK_AVAILABLE_BY_ID)
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        row.map(JobRow::into_job).transpose()
    }

    async fn update_status(&mut self, id: JobId, status: JobStatus) -> Result<()> {
        let result = sqlx::query("UPDATE job_queue SET status = $1 WHERE id = $2")
            .bind(status.as_str())
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() != 1 {
            return Err(AppError::Internal(format!(
                "Status update touched {} rows for job {}",
                result.rows_affected(),
                id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIGRATION: &str = include_str!("../migrations/001_create_job_queue.sql");

    #[test]
    fn test_lock_queries_match_partial_index_predicate() {
        let predicate = format!("status = '{}'", JobStatus::Available.as_str());

        assert!(MIGRATION.contains(&format!("WHERE {}", predicate)));
        assert!(LOCK_ONE_AVAILABLE.contains(&format!("WHERE {}", predicate)));
        assert!(LOCK_AVAILABLE_BY_ID.contains(&predicate));
        assert!(!LOCK_ONE_AVAILABLE.contains('$'));
    }
}
