//! Core Database Backend Traits
//!
//! This module defines the query-execution capability the retrieval strategies
//! are written against. Strategies never hold a global connection; a
//! `DatabasePool` is passed in explicitly, so tests can substitute an
//! in-memory implementation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{OrmError, OrmResult};

/// Abstract database connection pool trait
///
/// Every method call is one round trip to the database.
#[async_trait]
pub trait DatabasePool: Send + Sync {
    /// Execute a query and return all result rows
    async fn fetch_all(&self, sql: &str, params: &[DatabaseValue]) -> OrmResult<Vec<Box<dyn DatabaseRow>>>;

    /// Execute a query and return the first result row, or `None` when there is none
    async fn fetch_optional(&self, sql: &str, params: &[DatabaseValue]) -> OrmResult<Option<Box<dyn DatabaseRow>>>;

    /// Close the pool
    async fn close(&self) -> OrmResult<()>;

    /// Perform a health check on the pool
    async fn health_check(&self) -> OrmResult<Duration>;

    /// Dialect used to render placeholders for this pool
    fn sql_dialect(&self) -> SqlDialect {
        SqlDialect::PostgreSQL
    }
}

#[async_trait]
impl<P: DatabasePool + ?Sized> DatabasePool for Arc<P> {
    async fn fetch_all(&self, sql: &str, params: &[DatabaseValue]) -> OrmResult<Vec<Box<dyn DatabaseRow>>> {
        (**self).fetch_all(sql, params).await
    }

    async fn fetch_optional(&self, sql: &str, params: &[DatabaseValue]) -> OrmResult<Option<Box<dyn DatabaseRow>>> {
        (**self).fetch_optional(sql, params).await
    }

    async fn close(&self) -> OrmResult<()> {
        (**self).close().await
    }

    async fn health_check(&self) -> OrmResult<Duration> {
        (**self).health_check().await
    }

    fn sql_dialect(&self) -> SqlDialect {
        (**self).sql_dialect()
    }
}

/// Abstract database row trait
pub trait DatabaseRow: Send + Sync {
    /// Get a column value by name
    fn get_by_name(&self, name: &str) -> OrmResult<DatabaseValue>;
}

/// Conversion from a raw column value into a typed field
pub trait FromDatabaseValue: Sized {
    /// Name used in scan error messages
    const TYPE_NAME: &'static str;

    /// Convert a non-null value, returning `None` on a type mismatch
    fn from_database_value(value: &DatabaseValue) -> Option<Self>;
}

/// Extension trait for DatabaseRow to support typed column access
///
/// Each query shape maps its columns explicitly by name through these
/// accessors, so a renamed or retyped column fails as a scan error on the
/// first row instead of producing a half-filled struct.
pub trait DatabaseRowExt {
    /// Get a typed, non-null value from a column
    fn get<T: FromDatabaseValue>(&self, column: &str) -> OrmResult<T>;

    /// Get a typed value from a column, mapping SQL NULL to `None`
    fn try_get<T: FromDatabaseValue>(&self, column: &str) -> OrmResult<Option<T>>;
}

impl<R: DatabaseRow + ?Sized> DatabaseRowExt for R {
    fn get<T: FromDatabaseValue>(&self, column: &str) -> OrmResult<T> {
        self.try_get(column)?
            .ok_or_else(|| OrmError::Scan(format!("column '{}' is NULL, expected {}", column, T::TYPE_NAME)))
    }

    fn try_get<T: FromDatabaseValue>(&self, column: &str) -> OrmResult<Option<T>> {
        let value = self.get_by_name(column)?;
        if value.is_null() {
            return Ok(None);
        }

        T::from_database_value(&value).map(Some).ok_or_else(|| {
            OrmError::Scan(format!(
                "column '{}' holds {}, expected {}",
                column,
                value.type_name(),
                T::TYPE_NAME
            ))
        })
    }
}

/// Database value enumeration for type-safe parameter binding
#[derive(Debug, Clone, PartialEq)]
pub enum DatabaseValue {
    Null,
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    String(String),
    Date(chrono::NaiveDate),
    DateTime(chrono::DateTime<chrono::Utc>),
}

impl DatabaseValue {
    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, DatabaseValue::Null)
    }

    /// Short type name for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            DatabaseValue::Null => "NULL",
            DatabaseValue::Int32(_) => "int4",
            DatabaseValue::Int64(_) => "int8",
            DatabaseValue::Float32(_) => "float4",
            DatabaseValue::Float64(_) => "float8",
            DatabaseValue::String(_) => "text",
            DatabaseValue::Date(_) => "date",
            DatabaseValue::DateTime(_) => "timestamptz",
        }
    }
}

impl FromDatabaseValue for i64 {
    const TYPE_NAME: &'static str = "i64";

    fn from_database_value(value: &DatabaseValue) -> Option<Self> {
        match value {
            DatabaseValue::Int32(i) => Some(i64::from(*i)),
            DatabaseValue::Int64(i) => Some(*i),
            _ => None,
        }
    }
}

impl FromDatabaseValue for i32 {
    const TYPE_NAME: &'static str = "i32";

    fn from_database_value(value: &DatabaseValue) -> Option<Self> {
        match value {
            DatabaseValue::Int32(i) => Some(*i),
            DatabaseValue::Int64(i) => i32::try_from(*i).ok(),
            _ => None,
        }
    }
}

impl FromDatabaseValue for f64 {
    const TYPE_NAME: &'static str = "f64";

    fn from_database_value(value: &DatabaseValue) -> Option<Self> {
        match value {
            DatabaseValue::Float32(f) => Some(f64::from(*f)),
            DatabaseValue::Float64(f) => Some(*f),
            DatabaseValue::Int32(i) => Some(f64::from(*i)),
            _ => None,
        }
    }
}

impl FromDatabaseValue for String {
    const TYPE_NAME: &'static str = "string";

    fn from_database_value(value: &DatabaseValue) -> Option<Self> {
        match value {
            DatabaseValue::String(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl FromDatabaseValue for chrono::NaiveDate {
    const TYPE_NAME: &'static str = "date";

    fn from_database_value(value: &DatabaseValue) -> Option<Self> {
        match value {
            DatabaseValue::Date(d) => Some(*d),
            // TIMESTAMP columns carry a time part
            DatabaseValue::DateTime(dt) => Some(dt.date_naive()),
            _ => None,
        }
    }
}

impl From<i32> for DatabaseValue {
    fn from(value: i32) -> Self {
        DatabaseValue::Int32(value)
    }
}

impl From<i64> for DatabaseValue {
    fn from(value: i64) -> Self {
        DatabaseValue::Int64(value)
    }
}

impl From<f64> for DatabaseValue {
    fn from(value: f64) -> Self {
        DatabaseValue::Float64(value)
    }
}

impl From<String> for DatabaseValue {
    fn from(value: String) -> Self {
        DatabaseValue::String(value)
    }
}

impl From<&str> for DatabaseValue {
    fn from(value: &str) -> Self {
        DatabaseValue::String(value.to_string())
    }
}

impl From<chrono::NaiveDate> for DatabaseValue {
    fn from(value: chrono::NaiveDate) -> Self {
        DatabaseValue::Date(value)
    }
}

impl<T> From<Option<T>> for DatabaseValue
where
    T: Into<DatabaseValue>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => DatabaseValue::Null,
        }
    }
}

/// SQL dialect enumeration for generating database-specific SQL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlDialect {
    PostgreSQL,
}

impl SqlDialect {
    /// Get the parameter placeholder for the zero-based parameter `index`
    pub fn parameter_placeholder(&self, index: usize) -> String {
        match self {
            SqlDialect::PostgreSQL => format!("${}", index + 1),
        }
    }

    /// Largest number of bind parameters one statement may carry
    pub fn max_bind_parameters(&self) -> usize {
        match self {
            SqlDialect::PostgreSQL => 65_535,
        }
    }
}

/// Database backend trait that provides database-specific implementations
#[async_trait]
pub trait DatabaseBackend: Send + Sync {
    /// Create a connection pool from a database URL
    async fn create_pool(&self, database_url: &str, config: DatabasePoolConfig) -> OrmResult<Arc<dyn DatabasePool>>;

    /// Validate a database URL for this backend
    fn validate_database_url(&self, url: &str) -> OrmResult<()>;
}

/// Database pool configuration
#[derive(Debug, Clone)]
pub struct DatabasePoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_seconds: u64,
    pub idle_timeout_seconds: Option<u64>,
    pub max_lifetime_seconds: Option<u64>,
    pub test_before_acquire: bool,
}

impl Default for DatabasePoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 5,
            min_connections: 1,
            acquire_timeout_seconds: 30,
            idle_timeout_seconds: Some(300),
            max_lifetime_seconds: Some(1800),
            test_before_acquire: true,
        }
    }
}
