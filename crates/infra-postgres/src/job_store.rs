// PostgreSQL JobStore Implementation

use crate::error::map_sqlx_error;
use crate::PgJobTransaction;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use jobqueue_core::domain::{Job, JobStatus};
use jobqueue_core::error::{AppError, Result};
use jobqueue_core::port::{JobStore, JobStoreTransaction, TransactionalJobStore};
use sqlx::PgPool;
use tracing::debug;

pub struct PgJobStore {
    pool: PgPool,
}

impl PgJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn insert(&self, status: JobStatus, payload: &str) -> Result<Job> {
        let row = sqlx::query_as::<_, JobRow>(
            r#"
            INSERT INTO job_queue (status, payload)
            VALUES ($1, $2)
            RETURNING id, status, payload, timestamp
            "#,
        )
        .bind(status.as_str())
        .bind(payload)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        debug!(job_id = row.id, status = %status, "Inserted job");
        row.into_job()
    }

    async fn scan_all(&self) -> Result<Vec<Job>> {
        let rows: Vec<JobRow> = sqlx::query_as(
            r#"
            SELECT id, status, payload, timestamp
            FROM job_queue
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(JobRow::into_job).collect()
    }
}

#[async_trait]
impl TransactionalJobStore for PgJobStore {
    async fn begin_transaction(&self) -> Result<Box<dyn JobStoreTransaction>> {
        let tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        Ok(Box::new(PgJobTransaction::new(tx)))
    }
}

/// PostgreSQL row representation
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct JobRow {
    pub(crate) id: i64,
    status: String,
    payload: String,
    timestamp: DateTime<Utc>,
}

impl JobRow {
    pub(crate) fn into_job(self) -> Result<Job> {
        // The CHECK constraint makes this unreachable for rows we wrote
        let status = self.status.parse::<JobStatus>().map_err(|e| {
            AppError::Database(format!("Job {} has unreadable status: {}", self.id, e))
        })?;

        Ok(Job::new(self.id, status, self.payload, self.timestamp))
    }
}
