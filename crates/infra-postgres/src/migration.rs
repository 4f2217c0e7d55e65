// Migration Runner

use crate::error::map_sqlx_error;
use jobqueue_core::error::Result;
use sqlx::postgres::{PgConnection, PgPool};
use tracing::info;

/// Advisory lock key held while migrating, so concurrent daemons starting
/// against one database apply each migration once
const MIGRATION_LOCK_KEY: i64 = 0x6A6F_6271_7565_7565; // "jobqueue"

const MIGRATIONS: &[(i64, &str, &str)] = &[(
    1,
    "Create job_queue",
    include_str!("../migrations/001_create_job_queue.sql"),
)];

/// Run database migrations
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    info!("Running database migrations...");

    let mut tx = pool.begin().await.map_err(map_sqlx_error)?;

    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(MIGRATION_LOCK_KEY)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version BIGINT PRIMARY KEY,
            applied_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(&mut *tx)
    .await
    .map_err(map_sqlx_error)?;

    let current_version: i64 =
        sqlx::query_scalar("SELECT COALESCE(MAX(version), 0) FROM schema_version")
            .fetch_one(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

    info!("Current schema version: {}", current_version);

    // Apply migrations sequentially
    for (version, name, sql) in MIGRATIONS {
        if current_version < *version {
            info!("Applying migration {:03}: {}", version, name);
            apply_migration(&mut tx, sql).await?;
        }
    }

    tx.commit().await.map_err(map_sqlx_error)?;

    info!("All migrations applied successfully");
    Ok(())
}

/// Apply a single migration SQL file
async fn apply_migration(conn: &mut PgConnection, sql: &str) -> Result<()> {
    // Split by semicolon and execute each statement
    for statement in sql.split(';') {
        // Remove comments and trim
        let clean_statement: String = statement
            .lines()
            .filter(|line| !line.trim().starts_with("--"))
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string();

        if !clean_statement.is_empty() {
            sqlx::query(&clean_statement)
                .execute(&mut *conn)
                .await
                .map_err(map_sqlx_error)?;
        }
    }

    Ok(())
}
