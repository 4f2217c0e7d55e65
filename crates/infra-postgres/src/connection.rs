// PostgreSQL Connection Pool Setup

use crate::error::map_sqlx_error;
use jobqueue_core::error::{AppError, Result};
use sqlx::postgres::{PgConnectOptions, PgConnection, PgPool, PgPoolOptions};
use sqlx::Connection;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Pool configuration
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub max_connections: u32,
    /// Bounds the only wait claim-any can incur
    pub acquire_timeout: Duration,
    /// Dedicated schema for the queue tables (created if missing)
    pub schema: Option<String>,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            acquire_timeout: Duration::from_secs(5),
            schema: None,
        }
    }
}

/// Create PostgreSQL connection pool
pub async fn create_pool(database_url: &str, settings: &PoolSettings) -> Result<PgPool> {
    let mut options = PgConnectOptions::from_str(database_url)
        .map_err(|e| AppError::Config(format!("Invalid database URL: {}", e)))?;

    if let Some(schema) = &settings.schema {
        validate_schema_name(schema)?;
        ensure_schema(&options, schema).await?;
        options = options.options([("search_path", schema.as_str())]);
    }

    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout)
        .connect_with(options)
        .await
        .map_err(map_sqlx_error)?;

    info!(
        max_connections = settings.max_connections,
        schema = settings.schema.as_deref().unwrap_or("public"),
        "Database pool ready"
    );

    Ok(pool)
}

/// Schema names are interpolated into DDL, so only plain identifiers pass
fn validate_schema_name(schema: &str) -> Result<()> {
    let mut chars = schema.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_lowercase() || first == '_')
                && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        }
        None => false,
    };

    if !valid || schema.len() > 63 {
        return Err(AppError::Config(format!(
            "Invalid schema name {:?}: use lowercase letters, digits and '_'",
            schema
        )));
    }
    Ok(())
}

async fn ensure_schema(options: &PgConnectOptions, schema: &str) -> Result<()> {
    let mut conn = PgConnection::connect_with(options)
        .await
        .map_err(map_sqlx_error)?;

    sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {}", schema))
        .execute(&mut conn)
        .await
        .map_err(map_sqlx_error)?;

    conn.close().await.map_err(map_sqlx_error)?;
    Ok(())
}
