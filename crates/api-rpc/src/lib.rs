//! JSON-RPC API Layer
//!
//! Exposes the job queue's create, list and claim operations as JSON-RPC 2.0
//! methods over HTTP.

pub mod error;
pub mod handler;
pub mod server;
pub mod types;

pub use jsonrpsee::server::ServerHandle;
pub use server::{RpcServer, RpcServerConfig, ServerError};
