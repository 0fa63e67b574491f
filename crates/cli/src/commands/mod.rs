pub mod compare;
pub mod sample;
pub mod stats;

use std::sync::Arc;

use anyhow::Context;
use nplus1_orm::{DatabaseBackend, DatabasePool, PostgresBackend};
use tracing::{info, warn};

use crate::config::{mask_database_url, AppConfig};

/// Open the PostgreSQL pool described by `config`
pub async fn connect(config: &AppConfig) -> anyhow::Result<Arc<dyn DatabasePool>> {
    let masked = mask_database_url(&config.database.url);
    info!(database = %masked, max_connections = config.database.max_connections, "connecting");

    let pool = PostgresBackend::new()
        .create_pool(&config.database.url, config.database.pool_config())
        .await
        .with_context(|| format!("failed to connect to {}", masked))?;

    let latency = pool.health_check().await.context("database health check failed")?;
    info!(latency_ms = latency.as_secs_f64() * 1000.0, "database reachable");

    Ok(pool)
}

/// Close the pool; a failure here is logged and otherwise ignored
pub async fn close(pool: Arc<dyn DatabasePool>) {
    if let Err(e) = pool.close().await {
        warn!(error = %e, "failed to close database pool");
    }
}
