// In-Memory Transaction Implementation

use crate::store::Shared;
use async_trait::async_trait;
use jobqueue_core::domain::{Job, JobId, JobStatus};
use jobqueue_core::error::{AppError, Result};
use jobqueue_core::port::{JobStoreTransaction, Transaction};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::OwnedMutexGuard;
use tracing::{debug, trace, warn};

/// Open transaction against [`crate::MemoryJobStore`]
///
/// Row guards are released and staged updates discarded when this value is
/// dropped without `commit`.
pub struct MemoryJobTransaction {
    shared: Arc<Shared>,
    held: HashMap<JobId, OwnedMutexGuard<()>>,
    pending: Vec<(JobId, JobStatus)>,
}

impl MemoryJobTransaction {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        Self {
            shared,
            held: HashMap::new(),
            pending: Vec::new(),
        }
    }

    /// Status as seen from inside this transaction
    fn visible(&self, mut job: Job) -> Job {
        if let Some((_, status)) = self.pending.iter().rev().find(|(id, _)| *id == job.id) {
            job.status = *status;
        }
        job
    }
}

#[async_trait]
impl Transaction for MemoryJobTransaction {
    async fn commit(mut self: Box<Self>) -> Result<()> {
        if self.shared.faults.take_commit_failure() {
            warn!(
                staged = self.pending.len(),
                "Injected commit failure, discarding transaction"
            );
            return Err(AppError::Transaction(
                "injected commit failure".to_string(),
            ));
        }

        {
            // Applied before the row guards drop, so a waiter that acquires
            // the row afterwards sees the committed status
            let mut table = self.shared.table()?;
            for (id, status) in self.pending.drain(..) {
                match table.rows.get_mut(&id) {
                    Some(row) => row.job.status = status,
                    None => {
                        return Err(AppError::Transaction(format!(
                            "job {} vanished before commit",
                            id
                        )))
                    }
                }
            }
        }

        debug!(released = self.held.len(), "Transaction committed");
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        trace!(released = self.held.len(), "Transaction rolled back");
        Ok(())
    }
}

#[async_trait]
impl JobStoreTransaction for MemoryJobTransaction {
    async fn lock_one_available(&mut self) -> Result<Option<Job>> {
        let table = self.shared.table()?;

        for (id, row) in table.rows.iter() {
            if self.held.contains_key(id) {
                let job = self.visible(row.job.clone());
                if job.is_available() {
                    return Ok(Some(job));
                }
                continue;
            }
            if !row.job.is_available() {
                continue;
            }
            match Arc::clone(&row.lock).try_lock_owned() {
                Ok(guard) => {
                    self.held.insert(*id, guard);
                    return Ok(Some(row.job.clone()));
                }
                Err(_) => trace!(job_id = *id, "Skipping locked row"),
            }
        }

        Ok(None)
    }

    async fn lock_available_by_id(&mut self, id: JobId) -> Result<Option<Job>> {
        if self.held.contains_key(&id) {
            let table = self.shared.table()?;
            let job = table.rows.get(&id).map(|row| self.visible(row.job.clone()));
            return Ok(job.filter(Job::is_available));
        }

        let lock = self
            .shared
            .table()?
            .rows
            .get(&id)
            .map(|row| Arc::clone(&row.lock));
        let Some(lock) = lock else {
            return Ok(None);
        };

        // Blocks while another transaction holds this row
        let guard = lock.lock_owned().await;

        let job = self
            .shared
            .table()?
            .rows
            .get(&id)
            .map(|row| row.job.clone());

        match job {
            Some(job) if job.is_available() => {
                self.held.insert(id, guard);
                Ok(Some(job))
            }
            _ => Ok(None),
        }
    }

    async fn update_status(&mut self, id: JobId, status: JobStatus) -> Result<()> {
        if !self.held.contains_key(&id) {
            return Err(AppError::Internal(format!(
                "update of job {} without holding its row lock",
                id
            )));
        }
        self.pending.push((id, status));
        Ok(())
    }
}
