//! jobqueue CLI - Command-line client for the job queue server

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tabled::{Table, Tabled};

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8080";

/// Server codes for an empty queue and a lost claim
const NO_JOB_AVAILABLE: i32 = 4001;
const JOB_NOT_AVAILABLE: i32 = 4002;

#[derive(Parser)]
#[command(name = "jobqueue")]
#[command(about = "Job queue CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// RPC server URL
    #[arg(long, env = "JOBQUEUE_RPC_URL", default_value = DEFAULT_RPC_URL)]
    rpc_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new job
    Create {
        /// Initial status (available or claimed)
        #[arg(short, long)]
        status: Option<String>,

        /// Opaque job payload
        #[arg(short, long)]
        payload: String,
    },

    /// List all jobs
    List,

    /// Claim the oldest available job
    Claim,

    /// Claim a specific job
    ClaimId {
        /// Job ID
        #[arg(long)]
        id: i64,
    },
}

#[derive(Serialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    method: String,
    params: serde_json::Value,
    id: u64,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    #[allow(dead_code)]
    jsonrpc: String,
    #[allow(dead_code)]
    id: u64,
    result: Option<serde_json::Value>,
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

impl JsonRpcError {
    fn is_contention(&self) -> bool {
        matches!(self.code, NO_JOB_AVAILABLE | JOB_NOT_AVAILABLE)
    }
}

#[derive(Deserialize, Tabled)]
struct JobRow {
    id: i64,
    status: String,
    payload: String,
    timestamp: String,
}

#[derive(Deserialize)]
struct ListResult {
    jobs: Vec<JobRow>,
}

/// Outer error: the server could not be reached or answered garbage.
/// Inner error: the server answered with a JSON-RPC error.
async fn call_rpc(
    url: &str,
    method: &str,
    params: serde_json::Value,
) -> Result<std::result::Result<serde_json::Value, JsonRpcError>> {
    let request = JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        method: method.to_string(),
        params,
        id: 1,
    };

    let client = reqwest::Client::new();
    let response: JsonRpcResponse = client
        .post(url)
        .json(&request)
        .send()
        .await
        .context("Failed to connect to server")?
        .json()
        .await
        .context("Failed to parse response")?;

    if let Some(error) = response.error {
        return Ok(Err(error));
    }

    response
        .result
        .map(Ok)
        .ok_or_else(|| anyhow::anyhow!("No result in response"))
}

/// Print a claimed or created job, or report contention
fn print_job_outcome(
    outcome: std::result::Result<serde_json::Value, JsonRpcError>,
    headline: &str,
) -> Result<()> {
    match outcome {
        Ok(value) => {
            let job: JobRow = serde_json::from_value(value)?;
            println!("{}", headline.green().bold());
            println!();
            println!("{}", Table::new(vec![job]));
            Ok(())
        }
        Err(error) if error.is_contention() => {
            println!("{}", format!("⚠ {}", error.message).yellow());
            Ok(())
        }
        Err(error) => anyhow::bail!("RPC error ({}): {}", error.code, error.message),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Create { status, payload } => {
            let mut params = json!({ "payload": payload });
            if let Some(status) = status {
                params["status"] = json!(status);
            }

            let outcome = call_rpc(&cli.rpc_url, "jobs.create.v1", params).await?;
            print_job_outcome(outcome, "✓ Job created")?;
        }

        Commands::List => {
            let result = call_rpc(&cli.rpc_url, "jobs.list.v1", json!([]))
                .await?
                .map_err(|e| anyhow::anyhow!("RPC error ({}): {}", e.code, e.message))?;
            let list: ListResult = serde_json::from_value(result)?;

            if list.jobs.is_empty() {
                println!("{}", "No jobs".yellow());
            } else {
                println!("{}", Table::new(list.jobs));
            }
        }

        Commands::Claim => {
            let outcome = call_rpc(&cli.rpc_url, "jobs.claim.v1", json!([])).await?;
            print_job_outcome(outcome, "✓ Job claimed")?;
        }

        Commands::ClaimId { id } => {
            let outcome =
                call_rpc(&cli.rpc_url, "jobs.claim_by_id.v1", json!({ "id": id })).await?;
            print_job_outcome(outcome, &format!("✓ Job {} claimed", id))?;
        }
    }

    Ok(())
}
