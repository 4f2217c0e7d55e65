// Job Store Port (Interface)

use crate::domain::{Job, JobStatus};
use crate::error::Result;
use crate::port::TransactionalJobStore;
use async_trait::async_trait;

/// Store interface for Job persistence
///
/// Claim-side primitives live on [`crate::port::JobStoreTransaction`]; a
/// `JobStore` hands those out through `begin_transaction`.
#[async_trait]
pub trait JobStore: TransactionalJobStore {
    /// Insert a new job; the store assigns `id` and `timestamp`
    async fn insert(&self, status: JobStatus, payload: &str) -> Result<Job>;

    /// All jobs ordered by id ascending (no locking)
    async fn scan_all(&self) -> Result<Vec<Job>>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::domain::JobId;
    use crate::error::AppError;
    use crate::port::{JobStoreTransaction, Transaction};
    use chrono::Utc;
    use std::sync::{Arc, Mutex};

    /// Records every call so tests can assert on the protocol's shape.
    /// Rows are never actually locked.
    #[derive(Default)]
    struct MockState {
        jobs: Vec<Job>,
        calls: Vec<String>,
        fail_update: bool,
        fail_commit: bool,
        unavailable: bool,
        lock_ignores_status: bool,
    }

    /// Scripted job store for testing
    #[derive(Clone, Default)]
    pub struct MockJobStore {
        state: Arc<Mutex<MockState>>,
    }

    impl MockJobStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Seed available jobs with payloads `p1..=pN`
        pub fn with_available(count: usize) -> Self {
            let store = Self::new();
            {
                let mut state = store.state.lock().unwrap();
                for i in 1..=count {
                    state.jobs.push(Job::new(
                        i as JobId,
                        JobStatus::Available,
                        format!("p{}", i),
                        Utc::now(),
                    ));
                }
            }
            store
        }

        pub fn fail_update(self) -> Self {
            self.state.lock().unwrap().fail_update = true;
            self
        }

        pub fn fail_commit(self) -> Self {
            self.state.lock().unwrap().fail_commit = true;
            self
        }

        /// Lock calls hand out rows whatever their status
        pub fn lock_ignores_status(self) -> Self {
            self.state.lock().unwrap().lock_ignores_status = true;
            self
        }

        pub fn unavailable(self) -> Self {
            self.state.lock().unwrap().unavailable = true;
            self
        }

        pub fn calls(&self) -> Vec<String> {
            self.state.lock().unwrap().calls.clone()
        }

        pub fn jobs(&self) -> Vec<Job> {
            self.state.lock().unwrap().jobs.clone()
        }

        fn record(&self, call: impl Into<String>) {
            self.state.lock().unwrap().calls.push(call.into());
        }
    }

    #[async_trait]
    impl JobStore for MockJobStore {
        async fn insert(&self, status: JobStatus, payload: &str) -> Result<Job> {
            self.record(format!("insert({})", status));
            let mut state = self.state.lock().unwrap();
            if state.unavailable {
                return Err(AppError::StoreUnavailable("mock store offline".into()));
            }
            let job = Job::new(
                state.jobs.len() as JobId + 1,
                status,
                payload,
                Utc::now(),
            );
            state.jobs.push(job.clone());
            Ok(job)
        }

        async fn scan_all(&self) -> Result<Vec<Job>> {
            self.record("scan_all");
            let state = self.state.lock().unwrap();
            if state.unavailable {
                return Err(AppError::StoreUnavailable("mock store offline".into()));
            }
            let mut jobs = state.jobs.clone();
            jobs.sort_by_key(|j| j.id);
            Ok(jobs)
        }
    }

    #[async_trait]
    impl TransactionalJobStore for MockJobStore {
        async fn begin_transaction(&self) -> Result<Box<dyn JobStoreTransaction>> {
            self.record("begin");
            if self.state.lock().unwrap().unavailable {
                return Err(AppError::StoreUnavailable("mock store offline".into()));
            }
            Ok(Box::new(MockTransaction {
                store: self.clone(),
                pending: Vec::new(),
                finished: false,
            }))
        }
    }

    pub struct MockTransaction {
        store: MockJobStore,
        pending: Vec<(JobId, JobStatus)>,
        finished: bool,
    }

    #[async_trait]
    impl Transaction for MockTransaction {
        async fn commit(mut self: Box<Self>) -> Result<()> {
            self.finished = true;
            self.store.record("commit");
            let mut state = self.store.state.lock().unwrap();
            if state.fail_commit {
                return Err(AppError::Transaction("mock commit failure".into()));
            }
            for (id, status) in self.pending.drain(..) {
                if let Some(job) = state.jobs.iter_mut().find(|j| j.id == id) {
                    job.status = status;
                }
            }
            Ok(())
        }

        async fn rollback(mut self: Box<Self>) -> Result<()> {
            self.finished = true;
            self.store.record("rollback");
            Ok(())
        }
    }

    #[async_trait]
    impl JobStoreTransaction for MockTransaction {
        async fn lock_one_available(&mut self) -> Result<Option<Job>> {
            self.store.record("lock_one_available");
            let state = self.store.state.lock().unwrap();
            let any = state.lock_ignores_status;
            Ok(state
                .jobs
                .iter()
                .find(|j| any || j.is_available())
                .cloned())
        }

        async fn lock_available_by_id(&mut self, id: JobId) -> Result<Option<Job>> {
            self.store.record(format!("lock_available_by_id({})", id));
            let state = self.store.state.lock().unwrap();
            let any = state.lock_ignores_status;
            Ok(state
                .jobs
                .iter()
                .find(|j| j.id == id && (any || j.is_available()))
                .cloned())
        }

        async fn update_status(&mut self, id: JobId, status: JobStatus) -> Result<()> {
            self.store.record(format!("update_status({}, {})", id, status));
            if self.store.state.lock().unwrap().fail_update {
                return Err(AppError::Database("mock update failure".into()));
            }
            self.pending.push((id, status));
            Ok(())
        }
    }

    impl Drop for MockTransaction {
        fn drop(&mut self) {
            if !self.finished {
                self.store.record("dropped");
            }
        }
    }
}
