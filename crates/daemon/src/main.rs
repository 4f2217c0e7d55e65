//! Job queue server - Main Entry Point

mod config;
mod logging;

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use config::DaemonConfig;
use jobqueue_api_rpc::{RpcServer, RpcServerConfig};
use jobqueue_core::application::QueueService;
use jobqueue_core::port::JobStore;
use jobqueue_infra_memory::MemoryJobStore;
use jobqueue_infra_postgres::{create_pool, run_migrations, PgJobStore, PoolSettings};

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load configuration
    let config = DaemonConfig::from_env()?;

    // 2. Initialize logging
    logging::init(config.log_format)?;

    info!("jobqueue v{} starting...", jobqueue_core::VERSION);

    // 3. Build the job store
    let store = build_store(&config).await?;

    // 4. Wire the queue service and start JSON-RPC server
    let service = QueueService::new(store);
    let rpc_config = RpcServerConfig {
        host: config.rpc_host.clone(),
        port: config.rpc_port,
    };
    let (addr, rpc_handle) = RpcServer::new(rpc_config, service)
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("RPC server start failed: {}", e))?;

    info!(addr = %addr, "System ready. Press Ctrl+C to shutdown");

    // 5. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received. Exiting gracefully...");

    rpc_handle
        .stop()
        .map_err(|e| anyhow::anyhow!("RPC server stop failed: {}", e))?;
    rpc_handle.stopped().await;

    info!("Shutdown complete.");
    Ok(())
}

async fn build_store(config: &DaemonConfig) -> Result<Arc<dyn JobStore>> {
    if config.uses_memory_store() {
        tracing::warn!("Using in-memory job store; jobs are lost on exit");
        return Ok(Arc::new(MemoryJobStore::new()));
    }

    info!("Initializing database...");

    let settings = PoolSettings {
        max_connections: config.max_connections,
        acquire_timeout: config.acquire_timeout,
        schema: config.database_schema.clone(),
    };
    let pool = create_pool(&config.database_url, &settings)
        .await
        .map_err(|e| anyhow::anyhow!("DB pool creation failed: {}", e))?;
    run_migrations(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;

    Ok(Arc::new(PgJobStore::new(pool)))
}
