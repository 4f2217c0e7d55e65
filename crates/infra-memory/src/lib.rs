// jobqueue Infrastructure - In-Memory Adapter
// Implements: JobStore, TransactionalJobStore
//
// Row locks are per-row async mutexes: skip-locked scans use `try_lock`,
// targeted locks await the mutex. Staged status changes are applied on
// commit and discarded on rollback or drop.

mod fault;
mod store;
mod transaction;

pub use fault::FaultInjector;
pub use store::MemoryJobStore;
pub use transaction::MemoryJobTransaction;
