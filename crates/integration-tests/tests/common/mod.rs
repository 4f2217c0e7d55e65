//! Queue properties shared by every store backend
//!
//! Each check takes a fresh, empty store.

#![allow(dead_code)]

use jobqueue_core::application::{CreateJobRequest, QueueService};
use jobqueue_core::domain::{Job, JobStatus};
use jobqueue_core::error::AppError;
use jobqueue_core::port::{JobStore, JobStoreTransaction, Transaction, TransactionalJobStore};
use std::sync::Arc;
use std::time::Duration;

pub struct Harness {
    pub store: Arc<dyn JobStore>,
    pub service: QueueService,
}

impl Harness {
    pub fn new(store: Arc<dyn JobStore>) -> Self {
        Self {
            service: QueueService::new(store.clone()),
            store,
        }
    }

    pub async fn seed(&self, payloads: &[&str]) -> Vec<Job> {
        let mut jobs = Vec::new();
        for payload in payloads {
            jobs.push(
                self.service
                    .create(CreateJobRequest::new(*payload))
                    .await
                    .unwrap(),
            );
        }
        jobs
    }
}

/// create A, B -> list [A, B] -> claim A -> claim B -> empty
pub async fn check_scenario(h: &Harness) {
    let created = h.seed(&["A", "B"]).await;

    let listed = h.service.list().await.unwrap();
    assert_eq!(listed, created);
    assert!(listed.iter().all(|job| job.status == JobStatus::Available));

    let first = h.service.claim_any().await.unwrap();
    assert_eq!(first.id, created[0].id);
    assert_eq!(first.payload, "A");
    assert_eq!(first.status, JobStatus::Claimed);

    let second = h.service.claim_any().await.unwrap();
    assert_eq!(second.id, created[1].id);
    assert_eq!(second.payload, "B");

    let err = h.service.claim_any().await.unwrap_err();
    assert!(matches!(err, AppError::NoJobAvailable));

    let listed = h.service.list().await.unwrap();
    assert!(listed.iter().all(|job| job.status == JobStatus::Claimed));
}

/// Ids, payloads and timestamps come back exactly as created
pub async fn check_create_list_roundtrip(h: &Harness) {
    let a = h
        .service
        .create(CreateJobRequest::new("first"))
        .await
        .unwrap();
    let b = h
        .service
        .create(CreateJobRequest::new("").with_status("CLAIMED"))
        .await
        .unwrap();

    assert!(b.id > a.id);
    assert_eq!(b.status, JobStatus::Claimed);
    assert!(b.timestamp >= a.timestamp);

    let listed = h.service.list().await.unwrap();
    assert_eq!(listed, vec![a.clone(), b]);

    // A job created as claimed is never eligible
    assert_eq!(h.service.claim_any().await.unwrap().id, a.id);
    assert!(matches!(
        h.service.claim_any().await.unwrap_err(),
        AppError::NoJobAvailable
    ));
}

pub async fn check_invalid_create_leaves_store_untouched(h: &Harness) {
    let err = h
        .service
        .create(CreateJobRequest::new("x").with_status("done"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = h
        .service
        .create(CreateJobRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    assert!(h.service.list().await.unwrap().is_empty());
}

pub async fn check_claim_by_id_is_not_repeatable(h: &Harness) {
    let jobs = h.seed(&["A", "B"]).await;
    let target = jobs[1].id;

    let claimed = h.service.claim_by_id(target).await.unwrap();
    assert_eq!(claimed.id, target);
    assert_eq!(claimed.status, JobStatus::Claimed);

    for _ in 0..3 {
        let err = h.service.claim_by_id(target).await.unwrap_err();
        assert!(matches!(err, AppError::JobNotAvailable(id) if id == target));
    }

    // Missing ids look the same as claimed ones
    let err = h.service.claim_by_id(target + 1000).await.unwrap_err();
    assert!(matches!(err, AppError::JobNotAvailable(_)));

    // The other job is untouched
    assert_eq!(h.service.claim_any().await.unwrap().id, jobs[0].id);
}

/// `workers` concurrent claim-any calls against `jobs` jobs
pub async fn check_mutual_exclusion(h: &Harness, workers: usize, jobs: usize) {
    let payloads: Vec<String> = (0..jobs).map(|i| format!("job-{}", i)).collect();
    let refs: Vec<&str> = payloads.iter().map(String::as_str).collect();
    let created = h.seed(&refs).await;

    let mut handles = Vec::new();
    for _ in 0..workers {
        let service = h.service.clone();
        handles.push(tokio::spawn(async move { service.claim_any().await }));
    }

    let mut claimed = Vec::new();
    let mut empty = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(job) => claimed.push(job.id),
            Err(AppError::NoJobAvailable) => empty += 1,
            Err(e) => panic!("unexpected claim failure: {e}"),
        }
    }

    claimed.sort_unstable();
    let mut expected: Vec<_> = created.iter().map(|job| job.id).collect();
    expected.sort_unstable();

    assert_eq!(claimed, expected, "every job claimed exactly once");
    assert_eq!(empty, workers - jobs);
}

/// Concurrent claim-by-id on one job: exactly one winner
pub async fn check_same_id_race(h: &Harness, workers: usize) {
    let id = h.seed(&["contended"]).await[0].id;

    let mut handles = Vec::new();
    for _ in 0..workers {
        let service = h.service.clone();
        handles.push(tokio::spawn(async move { service.claim_by_id(id).await }));
    }

    let mut winners = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(job) => {
                assert_eq!(job.id, id);
                winners += 1;
            }
            Err(AppError::JobNotAvailable(lost)) => assert_eq!(lost, id),
            Err(e) => panic!("unexpected claim failure: {e}"),
        }
    }

    assert_eq!(winners, 1);
}

/// claim-any passes over a row another transaction holds
pub async fn check_claim_any_skips_locked(h: &Harness) {
    let jobs = h.seed(&["A", "B"]).await;

    let mut holder = h.store.begin_transaction().await.unwrap();
    let held = holder.lock_one_available().await.unwrap().unwrap();
    assert_eq!(held.id, jobs[0].id);

    let claimed = tokio::time::timeout(Duration::from_secs(5), h.service.claim_any())
        .await
        .expect("claim-any must not wait on a locked row")
        .unwrap();
    assert_eq!(claimed.id, jobs[1].id);

    // Released without change, so it is claimable again
    holder.rollback().await.unwrap();
    assert_eq!(h.service.claim_any().await.unwrap().id, jobs[0].id);
}

/// claim-by-id waits for the holder, then sees the committed claim
pub async fn check_claim_by_id_waits_for_holder(h: &Harness) {
    let id = h.seed(&["A"]).await[0].id;

    let mut holder = h.store.begin_transaction().await.unwrap();
    holder.lock_available_by_id(id).await.unwrap().unwrap();
    holder.update_status(id, JobStatus::Claimed).await.unwrap();

    let service = h.service.clone();
    let waiter = tokio::spawn(async move { service.claim_by_id(id).await });

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(!waiter.is_finished(), "claim-by-id must wait for the lock");

    holder.commit().await.unwrap();

    let err = waiter.await.unwrap().unwrap_err();
    assert!(matches!(err, AppError::JobNotAvailable(lost) if lost == id));
}

/// A dropped transaction releases its lock and discards its update
pub async fn check_dropped_transaction_releases_lock(h: &Harness) {
    let id = h.seed(&["A"]).await[0].id;

    {
        let mut tx = h.store.begin_transaction().await.unwrap();
        tx.lock_available_by_id(id).await.unwrap().unwrap();
        tx.update_status(id, JobStatus::Claimed).await.unwrap();
    }

    let claimed = tokio::time::timeout(Duration::from_secs(5), h.service.claim_by_id(id))
        .await
        .expect("lock must be released on drop")
        .unwrap();
    assert_eq!(claimed.id, id);
}
