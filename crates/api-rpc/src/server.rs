//! JSON-RPC Server
//!
//! Serves JSON-RPC 2.0 over HTTP on a TCP address.

use crate::handler::RpcHandler;
use crate::types::{ClaimByIdParams, CreateJobParams};
use jobqueue_core::application::QueueService;
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::RpcModule;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

const DEFAULT_RPC_HOST: &str = "127.0.0.1";
const DEFAULT_RPC_PORT: u16 = 8080;

pub const METHOD_CREATE: &str = "jobs.create.v1";
pub const METHOD_LIST: &str = "jobs.list.v1";
pub const METHOD_CLAIM: &str = "jobs.claim.v1";
pub const METHOD_CLAIM_BY_ID: &str = "jobs.claim_by_id.v1";

/// RPC Server Configuration
#[derive(Debug, Clone)]
pub struct RpcServerConfig {
    pub host: String,
    /// Port 0 binds an ephemeral port; see [`RpcServer::start`]
    pub port: u16,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_RPC_PORT,
        }
    }
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    #[error("Failed to register method: {0}")]
    Register(String),
}

/// RPC Server
pub struct RpcServer {
    config: RpcServerConfig,
    handler: Arc<RpcHandler>,
}

impl RpcServer {
    pub fn new(config: RpcServerConfig, service: QueueService) -> Self {
        Self {
            config,
            handler: Arc::new(RpcHandler::new(service)),
        }
    }

    /// Start the JSON-RPC server
    ///
    /// Returns the bound address along with the handle; stopping the handle
    /// shuts the server down.
    pub async fn start(self) -> Result<(SocketAddr, ServerHandle), ServerError> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        let server = Server::builder()
            .build(&addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.clone(),
                source,
            })?;
        let local_addr = server
            .local_addr()
            .map_err(|source| ServerError::Bind { addr, source })?;

        let module = self.build_module()?;
        let handle = server.start(module);

        info!(addr = %local_addr, "JSON-RPC server started");
        Ok((local_addr, handle))
    }

    fn build_module(&self) -> Result<RpcModule<()>, ServerError> {
        let mut module = RpcModule::new(());

        let handler = self.handler.clone();
        module
            .register_async_method(METHOD_CREATE, move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: CreateJobParams = params.parse()?;
                    handler.create(req).await
                }
            })
            .map_err(|e| ServerError::Register(e.to_string()))?;

        let handler = self.handler.clone();
        module
            .register_async_method(METHOD_LIST, move |_, _, _| {
                let handler = handler.clone();
                async move { handler.list().await }
            })
            .map_err(|e| ServerError::Register(e.to_string()))?;

        let handler = self.handler.clone();
        module
            .register_async_method(METHOD_CLAIM, move |_, _, _| {
                let handler = handler.clone();
                async move { handler.claim().await }
            })
            .map_err(|e| ServerError::Register(e.to_string()))?;

        let handler = self.handler.clone();
        module
            .register_async_method(METHOD_CLAIM_BY_ID, move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: ClaimByIdParams = params.parse()?;
                    handler.claim_by_id(req).await
                }
            })
            .map_err(|e| ServerError::Register(e.to_string()))?;

        Ok(module)
    }
}
