//! PostgreSQL Backend Implementation
//!
//! This module provides the PostgreSQL-specific implementation of the database
//! backend traits using sqlx as the underlying database driver.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use sqlx::postgres::{PgArguments, PgPoolOptions, PgRow};
use sqlx::{Column, Pool, Postgres, Row, TypeInfo};

use super::core::*;
use crate::error::{OrmError, OrmResult};

/// PostgreSQL database backend implementation
#[derive(Debug, Default)]
pub struct PostgresBackend;

impl PostgresBackend {
    /// Create a new PostgreSQL backend instance
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DatabaseBackend for PostgresBackend {
    async fn create_pool(&self, database_url: &str, config: DatabasePoolConfig) -> OrmResult<Arc<dyn DatabasePool>> {
        self.validate_database_url(database_url)?;

        let mut options = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
            .test_before_acquire(config.test_before_acquire);

        if let Some(idle_timeout) = config.idle_timeout_seconds {
            options = options.idle_timeout(Duration::from_secs(idle_timeout));
        }

        if let Some(max_lifetime) = config.max_lifetime_seconds {
            options = options.max_lifetime(Duration::from_secs(max_lifetime));
        }

        let sqlx_pool = options
            .connect(database_url)
            .await
            .map_err(|e| OrmError::Connection(format!("Failed to create PostgreSQL pool: {}", e)))?;

        tracing::debug!(
            max_connections = config.max_connections,
            "PostgreSQL pool created"
        );

        Ok(Arc::new(PostgresPool::new(sqlx_pool)))
    }

    fn validate_database_url(&self, url: &str) -> OrmResult<()> {
        if !url.starts_with("postgresql://") && !url.starts_with("postgres://") {
            return Err(OrmError::Connection("Invalid PostgreSQL URL scheme".to_string()));
        }
        url::Url::parse(url).map_err(|e| OrmError::Connection(format!("Invalid database URL: {}", e)))?;
        Ok(())
    }
}

/// PostgreSQL connection pool implementation
pub struct PostgresPool {
    pool: Pool<Postgres>,
}

impl PostgresPool {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DatabasePool for PostgresPool {
    async fn fetch_all(&self, sql: &str, params: &[DatabaseValue]) -> OrmResult<Vec<Box<dyn DatabaseRow>>> {
        // fetch_all drains the cursor and returns the connection to the pool
        // before handing back the rows, on the error path as well
        let rows = bind_all(sqlx::query(sql), params)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| OrmError::from(e).context("query fetch failed"))?;

        Ok(rows
            .into_iter()
            .map(|row| Box::new(PostgresRow::new(row)) as Box<dyn DatabaseRow>)
            .collect())
    }

    async fn fetch_optional(&self, sql: &str, params: &[DatabaseValue]) -> OrmResult<Option<Box<dyn DatabaseRow>>> {
        let row = bind_all(sqlx::query(sql), params)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| OrmError::from(e).context("query fetch failed"))?;

        Ok(row.map(|r| Box::new(PostgresRow::new(r)) as Box<dyn DatabaseRow>))
    }

    async fn close(&self) -> OrmResult<()> {
        self.pool.close().await;
        Ok(())
    }

    async fn health_check(&self) -> OrmResult<Duration> {
        let start = Instant::now();

        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| OrmError::Connection(format!("Health check failed: {}", e)))?;

        Ok(start.elapsed())
    }

    fn sql_dialect(&self) -> SqlDialect {
        SqlDialect::PostgreSQL
    }
}

/// PostgreSQL row implementation
pub struct PostgresRow {
    row: PgRow,
}

impl PostgresRow {
    pub fn new(row: PgRow) -> Self {
        Self { row }
    }
}

impl DatabaseRow for PostgresRow {
    fn get_by_name(&self, name: &str) -> OrmResult<DatabaseValue> {
        let index = self
            .row
            .columns()
            .iter()
            .position(|col| col.name() == name)
            .ok_or_else(|| OrmError::ColumnNotFound(name.to_string()))?;

        postgres_value_to_database_value(&self.row, index)
    }
}

fn bind_all<'q>(
    mut query: sqlx::query::Query<'q, Postgres, PgArguments>,
    params: &[DatabaseValue],
) -> sqlx::query::Query<'q, Postgres, PgArguments> {
    for param in params {
        query = bind_database_value(query, param);
    }
    query
}

/// Bind a DatabaseValue to a sqlx query
fn bind_database_value<'q>(
    query: sqlx::query::Query<'q, Postgres, PgArguments>,
    value: &DatabaseValue,
) -> sqlx::query::Query<'q, Postgres, PgArguments> {
    match value {
        DatabaseValue::Null => query.bind(Option::<String>::None),
        DatabaseValue::Int32(i) => query.bind(*i),
        DatabaseValue::Int64(i) => query.bind(*i),
        DatabaseValue::Float32(f) => query.bind(*f),
        DatabaseValue::Float64(f) => query.bind(*f),
        DatabaseValue::String(s) => query.bind(s.clone()),
        DatabaseValue::Date(d) => query.bind(*d),
        DatabaseValue::DateTime(dt) => query.bind(*dt),
    }
}

fn decode<'r, T>(row: &'r PgRow, index: usize, type_name: &str) -> OrmResult<Option<T>>
where
    T: sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres>,
{
    row.try_get::<Option<T>, _>(index)
        .map_err(|e| OrmError::Scan(format!("Failed to decode {} column #{}: {}", type_name, index, e)))
}

/// Convert a PostgreSQL column value to DatabaseValue
fn postgres_value_to_database_value(row: &PgRow, index: usize) -> OrmResult<DatabaseValue> {
    let type_name = row.columns()[index].type_info().name();

    let value = match type_name {
        "INT2" => decode::<i16>(row, index, type_name)?.map(|v| DatabaseValue::Int32(i32::from(v))),
        "INT4" => decode::<i32>(row, index, type_name)?.map(DatabaseValue::Int32),
        "INT8" => decode::<i64>(row, index, type_name)?.map(DatabaseValue::Int64),
        "FLOAT4" => decode::<f32>(row, index, type_name)?.map(DatabaseValue::Float32),
        "FLOAT8" => decode::<f64>(row, index, type_name)?.map(DatabaseValue::Float64),
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" => decode::<String>(row, index, type_name)?.map(DatabaseValue::String),
        "DATE" => decode::<chrono::NaiveDate>(row, index, type_name)?.map(DatabaseValue::Date),
        "TIMESTAMPTZ" => decode::<chrono::DateTime<chrono::Utc>>(row, index, type_name)?.map(DatabaseValue::DateTime),
        "TIMESTAMP" => decode::<chrono::NaiveDateTime>(row, index, type_name)?
            .map(|v| DatabaseValue::DateTime(v.and_utc())),
        other => {
            // NUMERIC needs a decimal crate; the repository queries cast to float8
            return Err(OrmError::Scan(format!(
                "Unsupported column type '{}' at #{}",
                other, index
            )));
        }
    };

    Ok(value.unwrap_or(DatabaseValue::Null))
}
