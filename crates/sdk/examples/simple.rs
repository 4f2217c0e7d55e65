//! Simple SDK Example
//!
//! Creates two jobs and claims them until the queue is empty.
//!
//! # Usage
//!
//! 1. Start the server:
//!    ```bash
//!    JOBQUEUE_DATABASE_URL=memory cargo run --package jobqueue-daemon
//!    ```
//!
//! 2. Run this example:
//!    ```bash
//!    cargo run --package jobqueue-sdk --example simple
//!    ```

use jobqueue_sdk::JobQueueClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("jobqueue SDK - Simple Example");
    println!("=============================\n");

    // 1. Connect to server
    println!("1. Connecting to server...");
    let client = JobQueueClient::connect("http://127.0.0.1:8080").await?;
    println!("   ✓ Connected\n");

    // 2. Create jobs
    println!("2. Creating jobs...");
    for payload in ["A", "B"] {
        let job = client.create_job(payload, None).await?;
        println!("   ✓ Job {} created ({})", job.id, job.status);
    }
    println!();

    // 3. Claim until empty
    println!("3. Claiming jobs...");
    loop {
        match client.claim().await {
            Ok(job) => println!("   ✓ Claimed job {}: {}", job.id, job.payload),
            Err(e) if e.is_contention() => {
                println!("   ⚠ {}", e);
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }

    // 4. Show final state
    println!("\n4. Listing jobs...");
    for job in client.list_jobs().await? {
        println!("     - {} [{}] {}", job.id, job.status, job.payload);
    }

    println!("\n✓ Example completed successfully!");

    Ok(())
}
