//! In-memory scripted backend
//!
//! `MemoryPool` answers every call through a handler closure and records the
//! SQL and parameters it was given. It stands in for a live database in
//! tests and lets them assert exactly which statements a strategy issued.
//! Only compiled for this crate's tests or with the `testing` feature.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use super::core::*;
use crate::error::{OrmError, OrmResult};

/// A row held entirely in memory
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryRow {
    columns: Vec<(String, DatabaseValue)>,
}

impl MemoryRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column
    pub fn with(mut self, name: &str, value: impl Into<DatabaseValue>) -> Self {
        self.columns.push((name.to_string(), value.into()));
        self
    }
}

impl DatabaseRow for MemoryRow {
    fn get_by_name(&self, name: &str) -> OrmResult<DatabaseValue> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, value)| value.clone())
            .ok_or_else(|| OrmError::ColumnNotFound(name.to_string()))
    }
}

/// One call received by a `MemoryPool`
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedQuery {
    pub sql: String,
    pub params: Vec<DatabaseValue>,
}

type Handler = dyn Fn(&str, &[DatabaseValue]) -> OrmResult<Vec<MemoryRow>> + Send + Sync;

/// Scripted in-memory pool
#[derive(Clone)]
pub struct MemoryPool {
    handler: Arc<Handler>,
    log: Arc<Mutex<Vec<RecordedQuery>>>,
}

impl MemoryPool {
    /// Pool whose every query is answered by `handler`
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&str, &[DatabaseValue]) -> OrmResult<Vec<MemoryRow>> + Send + Sync + 'static,
    {
        Self {
            handler: Arc::new(handler),
            log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Every call received so far, in order
    pub fn queries(&self) -> Vec<RecordedQuery> {
        self.log.lock().map(|log| log.clone()).unwrap_or_default()
    }

    pub fn query_count(&self) -> usize {
        self.log.lock().map(|log| log.len()).unwrap_or(0)
    }

    pub fn clear_log(&self) {
        if let Ok(mut log) = self.log.lock() {
            log.clear();
        }
    }

    fn run(&self, sql: &str, params: &[DatabaseValue]) -> OrmResult<Vec<MemoryRow>> {
        if let Ok(mut log) = self.log.lock() {
            log.push(RecordedQuery {
                sql: sql.to_string(),
                params: params.to_vec(),
            });
        }
        (self.handler)(sql, params)
    }
}

#[async_trait]
impl DatabasePool for MemoryPool {
    async fn fetch_all(&self, sql: &str, params: &[DatabaseValue]) -> OrmResult<Vec<Box<dyn DatabaseRow>>> {
        Ok(self
            .run(sql, params)?
            .into_iter()
            .map(|row| Box::new(row) as Box<dyn DatabaseRow>)
            .collect())
    }

    async fn fetch_optional(&self, sql: &str, params: &[DatabaseValue]) -> OrmResult<Option<Box<dyn DatabaseRow>>> {
        Ok(self
            .run(sql, params)?
            .into_iter()
            .next()
            .map(|row| Box::new(row) as Box<dyn DatabaseRow>))
    }

    async fn close(&self) -> OrmResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> OrmResult<Duration> {
        Ok(Duration::ZERO)
    }
}
