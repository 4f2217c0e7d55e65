// Transaction port for the claim protocol

use crate::domain::{Job, JobId, JobStatus};
use crate::error::Result;
use async_trait::async_trait;

/// Transaction trait for atomic multi-step operations
///
/// Implementations must roll back when dropped without `commit`, so that
/// every early return (and unwinding panic) releases row locks and discards
/// staged changes.
#[async_trait]
pub trait Transaction: Send {
    /// Commit the transaction
    ///
    /// On failure no change made inside the transaction may become visible.
    async fn commit(self: Box<Self>) -> Result<()>;

    /// Rollback the transaction
    async fn rollback(self: Box<Self>) -> Result<()>;
}

/// Transactional JobStore operations
#[async_trait]
pub trait TransactionalJobStore: Send + Sync {
    /// Begin a new transaction
    async fn begin_transaction(&self) -> Result<Box<dyn JobStoreTransaction>>;
}

/// JobStore operations within a transaction
#[async_trait]
pub trait JobStoreTransaction: Transaction {
    /// Lock the lowest-id available job, skipping rows locked elsewhere
    ///
    /// Never waits on row contention. `None` when no available row is free.
    async fn lock_one_available(&mut self) -> Result<Option<Job>>;

    /// Lock job `id` if it is available
    ///
    /// Waits when another transaction holds that row, then re-checks
    /// availability. `None` when the row is missing or not available.
    async fn lock_available_by_id(&mut self, id: JobId) -> Result<Option<Job>>;

    /// Update status of a row locked by this transaction
    async fn update_status(&mut self, id: JobId, status: JobStatus) -> Result<()>;
}
