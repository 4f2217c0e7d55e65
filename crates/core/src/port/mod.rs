// Port Layer - Interfaces for external dependencies

pub mod job_store;
pub mod time_provider; // For deterministic testing
pub mod transaction;

// Re-exports
pub use job_store::JobStore;
pub use time_provider::TimeProvider;
pub use transaction::{JobStoreTransaction, Transaction, TransactionalJobStore};
