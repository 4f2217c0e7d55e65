//! jobqueue SDK - Rust Client Library
//!
//! Typed client for the job queue JSON-RPC server.
//!
//! # Example
//!
//! ```no_run
//! use jobqueue_sdk::JobQueueClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = JobQueueClient::connect("http://127.0.0.1:8080").await?;
//!
//!     let job = client.create_job("resize image 42", None).await?;
//!     println!("Job created: {}", job.id);
//!
//!     match client.claim().await {
//!         Ok(job) => println!("Claimed {}: {}", job.id, job.payload),
//!         Err(e) if e.is_contention() => println!("Nothing to do"),
//!         Err(e) => return Err(e.into()),
//!     }
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::JobQueueClient;
pub use error::{code, Result, SdkError};
pub use types::{Job, JobStatus};
