//! Claim protocol against PostgreSQL
//!
//! Runs only when JOBQUEUE_TEST_DATABASE_URL is set. Each test migrates its
//! own schema, so tests never see each other's rows.

mod common;

use common::Harness;
use jobqueue_infra_postgres::{create_pool, run_migrations, PgJobStore, PoolSettings};
use std::sync::Arc;

async fn harness() -> Option<Harness> {
    let Ok(url) = std::env::var("JOBQUEUE_TEST_DATABASE_URL") else {
        eprintln!("skipping: JOBQUEUE_TEST_DATABASE_URL not set");
        return None;
    };

    let settings = PoolSettings {
        max_connections: 8,
        schema: Some(format!("jq_it_{}", uuid::Uuid::new_v4().simple())),
        ..Default::default()
    };
    let pool = create_pool(&url, &settings).await.unwrap();
    run_migrations(&pool).await.unwrap();

    Some(Harness::new(Arc::new(PgJobStore::new(pool))))
}

#[tokio::test]
async fn test_scenario_create_list_claim_until_empty() {
    let Some(h) = harness().await else { return };
    common::check_scenario(&h).await;
}

#[tokio::test]
async fn test_create_list_roundtrip() {
    let Some(h) = harness().await else { return };
    common::check_create_list_roundtrip(&h).await;
}

#[tokio::test]
async fn test_invalid_create_is_rejected() {
    let Some(h) = harness().await else { return };
    common::check_invalid_create_leaves_store_untouched(&h).await;
}

#[tokio::test]
async fn test_claim_by_id_is_not_repeatable() {
    let Some(h) = harness().await else { return };
    common::check_claim_by_id_is_not_repeatable(&h).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_claim_any_mutual_exclusion() {
    let Some(h) = harness().await else { return };
    common::check_mutual_exclusion(&h, 20, 5).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_claim_by_id_single_winner() {
    let Some(h) = harness().await else { return };
    common::check_same_id_race(&h, 6).await;
}

#[tokio::test]
async fn test_claim_any_skips_locked_row() {
    let Some(h) = harness().await else { return };
    common::check_claim_any_skips_locked(&h).await;
}

#[tokio::test]
async fn test_claim_by_id_waits_for_holder() {
    let Some(h) = harness().await else { return };
    common::check_claim_by_id_waits_for_holder(&h).await;
}

#[tokio::test]
async fn test_dropped_transaction_releases_lock() {
    let Some(h) = harness().await else { return };
    common::check_dropped_transaction_releases_lock(&h).await;
}
