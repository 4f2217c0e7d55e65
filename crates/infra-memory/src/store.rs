// In-Memory JobStore Implementation

use crate::fault::FaultInjector;
use crate::transaction::MemoryJobTransaction;
use async_trait::async_trait;
use jobqueue_core::domain::{Job, JobId, JobStatus};
use jobqueue_core::error::{AppError, Result};
use jobqueue_core::port::time_provider::SystemTimeProvider;
use jobqueue_core::port::{JobStore, JobStoreTransaction, TimeProvider, TransactionalJobStore};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

pub(crate) struct Row {
    pub(crate) job: Job,
    /// Held by at most one open transaction
    pub(crate) lock: Arc<tokio::sync::Mutex<()>>,
}

/// Rows keyed by id, so iteration order is claim order
pub(crate) struct Table {
    pub(crate) rows: BTreeMap<JobId, Row>,
    next_id: JobId,
}

pub(crate) struct Shared {
    table: Mutex<Table>,
    pub(crate) faults: FaultInjector,
}

impl Shared {
    /// The table mutex is only held for short synchronous sections, never
    /// across an await.
    pub(crate) fn table(&self) -> Result<MutexGuard<'_, Table>> {
        self.table
            .lock()
            .map_err(|_| AppError::Internal("job table mutex poisoned".to_string()))
    }

    fn ensure_online(&self) -> Result<()> {
        if self.faults.is_offline() {
            return Err(AppError::StoreUnavailable(
                "in-memory store is offline".to_string(),
            ));
        }
        Ok(())
    }
}

/// In-memory job store
///
/// Cheap to clone; clones share the same table.
#[derive(Clone)]
pub struct MemoryJobStore {
    shared: Arc<Shared>,
    time_provider: Arc<dyn TimeProvider>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::with_time_provider(Arc::new(SystemTimeProvider))
    }

    pub fn with_time_provider(time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            shared: Arc::new(Shared {
                table: Mutex::new(Table {
                    rows: BTreeMap::new(),
                    next_id: 1,
                }),
                faults: FaultInjector::default(),
            }),
            time_provider,
        }
    }

    /// Failure switches for tests
    pub fn faults(&self) -> &FaultInjector {
        &self.shared.faults
    }
}

impl Default for MemoryJobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn insert(&self, status: JobStatus, payload: &str) -> Result<Job> {
        self.shared.ensure_online()?;

        let mut table = self.shared.table()?;
        let id = table.next_id;
        table.next_id += 1;

        let job = Job::new(id, status, payload, self.time_provider.now());
        table.rows.insert(
            id,
            Row {
                job: job.clone(),
                lock: Arc::new(tokio::sync::Mutex::new(())),
            },
        );

        debug!(job_id = id, status = %status, "Inserted job");
        Ok(job)
    }

    async fn scan_all(&self) -> Result<Vec<Job>> {
        self.shared.ensure_online()?;

        let table = self.shared.table()?;
        Ok(table.rows.values().map(|row| row.job.clone()).collect())
    }
}

#[async_trait]
impl TransactionalJobStore for MemoryJobStore {
    async fn begin_transaction(&self) -> Result<Box<dyn JobStoreTransaction>> {
        self.shared.ensure_online()?;
        Ok(Box::new(MemoryJobTransaction::new(Arc::clone(&self.shared))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use jobqueue_core::port::time_provider::FixedTimeProvider;

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let store = MemoryJobStore::new();

        let a = store.insert(JobStatus::Available, "p1").await.unwrap();
        let b = store.insert(JobStatus::Claimed, "p2").await.unwrap();

        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(b.status, JobStatus::Claimed);
    }

    #[tokio::test]
    async fn test_insert_uses_time_provider() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let store = MemoryJobStore::with_time_provider(Arc::new(FixedTimeProvider(at)));

        let job = store.insert(JobStatus::Available, "x").await.unwrap();

        assert_eq!(job.timestamp, at);
    }

    #[tokio::test]
    async fn test_scan_all_is_ordered_by_id() {
        let store = MemoryJobStore::new();
        for i in 0..5 {
            store
                .insert(JobStatus::Available, &format!("p{}", i))
                .await
                .unwrap();
        }

        let ids: Vec<JobId> = store
            .scan_all()
            .await
            .unwrap()
            .iter()
            .map(|j| j.id)
            .collect();

        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_offline_store_is_unavailable() {
        let store = MemoryJobStore::new();
        store.faults().set_offline(true);

        let err = store.insert(JobStatus::Available, "x").await.unwrap_err();
        assert!(matches!(err, AppError::StoreUnavailable(_)));
        assert!(store.scan_all().await.is_err());
        assert!(store.begin_transaction().await.is_err());
    }
}
