// jobqueue Infrastructure - PostgreSQL Adapter
// Implements: JobStore, TransactionalJobStore
//
// Row locking is delegated to PostgreSQL: claim-any uses
// `FOR UPDATE SKIP LOCKED`, claim-by-id uses a plain `FOR UPDATE`.

mod connection;
mod error;
mod job_store;
mod migration;
mod transaction;

pub use connection::{create_pool, PoolSettings};
pub use job_store::PgJobStore;
pub use migration::run_migrations;
pub use transaction::PgJobTransaction;

// Note: sqlx::Error conversion is handled by helper functions in `error`
// due to Rust's orphan rules (cannot implement From<sqlx::Error> for AppError here)
