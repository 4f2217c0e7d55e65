// Claim Protocol
//
// Both entry points share one shape: begin -> lock -> update -> commit.
// The store's row lock is the only mutual exclusion; nothing here holds
// in-process locks. A transaction dropped on an error path rolls back.

use crate::domain::{Job, JobId, JobStatus};
use crate::error::Result;
use crate::port::{JobStoreTransaction, Transaction, TransactionalJobStore};
use tracing::{debug, warn};

/// Claim the lowest-id available job
///
/// Never waits behind a row another consumer is claiming; such rows are
/// skipped. Returns `Ok(None)` when nothing is claimable.
pub async fn claim_any<S>(store: &S) -> Result<Option<Job>>
where
    S: TransactionalJobStore + ?Sized,
{
    let mut tx = store.begin_transaction().await?;

    let Some(job) = tx.lock_one_available().await? else {
        abort(tx).await;
        debug!("No available job to claim");
        return Ok(None);
    };

    finish_claim(tx, job).await.map(Some)
}

/// Claim one specific job
///
/// Waits if another transaction holds the row, then re-checks availability.
/// Returns `Ok(None)` when the job is missing or no longer available; the
/// two cases are deliberately not distinguished.
pub async fn claim_by_id<S>(store: &S, id: JobId) -> Result<Option<Job>>
where
    S: TransactionalJobStore + ?Sized,
{
    let mut tx = store.begin_transaction().await?;

    let Some(job) = tx.lock_available_by_id(id).await? else {
        abort(tx).await;
        debug!(job_id = id, "Job not available to claim");
        return Ok(None);
    };

    finish_claim(tx, job).await.map(Some)
}

/// Persist available -> claimed for a row locked by `tx`, then commit
///
/// The transition is checked before anything is written, so a row that is
/// not available drops `tx` uncommitted.
async fn finish_claim(mut tx: Box<dyn JobStoreTransaction>, mut job: Job) -> Result<Job> {
    job.claim()?;

    tx.update_status(job.id, job.status).await?;
    tx.commit().await?;

    debug!(job_id = job.id, "Job claimed");
    Ok(job)
}

/// Roll back a transaction that locked nothing
///
/// A failed rollback is logged, not surfaced: no row was locked or changed,
/// and the store discards the transaction when the connection is released.
async fn abort(tx: Box<dyn JobStoreTransaction>) {
    if let Err(e) = tx.rollback().await {
        warn!(error = %e, "Rollback of empty claim transaction failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::port::job_store::mocks::MockJobStore;

    #[tokio::test]
    async fn test_claim_any_follows_lock_update_commit() {
        let store = MockJobStore::with_available(2);

        let job = claim_any(&store).await.unwrap().unwrap();

        assert_eq!(job.id, 1);
        assert_eq!(job.status, JobStatus::Claimed);
        assert_eq!(job.payload, "p1");
        assert_eq!(
            store.calls(),
            vec![
                "begin",
                "lock_one_available",
                "update_status(1, claimed)",
                "commit"
            ]
        );
    }

    #[tokio::test]
    async fn test_claim_any_empty_queue_rolls_back() {
        let store = MockJobStore::new();

        let result = claim_any(&store).await.unwrap();

        assert!(result.is_none());
        assert_eq!(store.calls(), vec!["begin", "lock_one_available", "rollback"]);
    }

    #[tokio::test]
    async fn test_claim_by_id_missing_rolls_back() {
        let store = MockJobStore::with_available(1);

        let result = claim_by_id(&store, 99).await.unwrap();

        assert!(result.is_none());
        assert_eq!(
            store.calls(),
            vec!["begin", "lock_available_by_id(99)", "rollback"]
        );
    }

    #[tokio::test]
    async fn test_claim_by_id_claims_target() {
        let store = MockJobStore::with_available(3);

        let job = claim_by_id(&store, 2).await.unwrap().unwrap();

        assert_eq!(job.id, 2);
        assert_eq!(job.status, JobStatus::Claimed);
        assert_eq!(store.jobs()[1].status, JobStatus::Claimed);
        assert_eq!(store.jobs()[0].status, JobStatus::Available);
    }

    #[tokio::test]
    async fn test_update_failure_never_commits() {
        let store = MockJobStore::with_available(1).fail_update();

        let err = claim_any(&store).await.unwrap_err();

        assert!(matches!(err, AppError::Database(_)));
        let calls = store.calls();
        assert!(!calls.contains(&"commit".to_string()));
        assert_eq!(calls.last().map(String::as_str), Some("dropped"));
        assert_eq!(store.jobs()[0].status, JobStatus::Available);
    }

    #[tokio::test]
    async fn test_commit_failure_leaves_job_available() {
        let store = MockJobStore::with_available(1).fail_commit();

        let err = claim_by_id(&store, 1).await.unwrap_err();

        assert!(matches!(err, AppError::Transaction(_)));
        assert!(err.is_retryable());
        assert_eq!(store.jobs()[0].status, JobStatus::Available);
    }

    #[tokio::test]
    async fn test_locked_row_not_available_is_never_written() {
        let store = MockJobStore::with_available(1).lock_ignores_status();
        claim_by_id(&store, 1).await.unwrap().unwrap();

        let err = claim_by_id(&store, 1).await.unwrap_err();

        assert!(matches!(err, AppError::Domain(_)));
        let calls = store.calls();
        let second = &calls[calls.len() - 3..];
        assert_eq!(second, ["begin", "lock_available_by_id(1)", "dropped"]);
    }

    #[tokio::test]
    async fn test_begin_failure_propagates() {
        let store = MockJobStore::with_available(1).unavailable();

        let err = claim_any(&store).await.unwrap_err();

        assert!(matches!(err, AppError::StoreUnavailable(_)));
        assert_eq!(store.calls(), vec!["begin"]);
    }
}
