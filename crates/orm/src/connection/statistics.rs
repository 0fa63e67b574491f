//! Round-trip statistics
//!
//! `CountingPool` wraps any `DatabasePool` and counts every call that reaches
//! the database. The timing harness uses it to report how many round trips
//! each strategy needed.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::backends::{DatabasePool, DatabaseRow, DatabaseValue, SqlDialect};
use crate::error::OrmResult;

/// Pool decorator that counts round trips
pub struct CountingPool<P: ?Sized> {
    inner: Arc<P>,
    round_trips: AtomicU64,
}

impl<P: DatabasePool + ?Sized> CountingPool<P> {
    pub fn new(inner: Arc<P>) -> Self {
        Self {
            inner,
            round_trips: AtomicU64::new(0),
        }
    }

    /// Calls that reached the database since the last reset, failed ones included
    pub fn round_trips(&self) -> u64 {
        self.round_trips.load(Ordering::Relaxed)
    }

    /// Reset the counter to zero and return the value it held
    pub fn reset(&self) -> u64 {
        self.round_trips.swap(0, Ordering::Relaxed)
    }

    fn record(&self) {
        self.round_trips.fetch_add(1, Ordering::Relaxed);
    }
}

#[async_trait]
impl<P: DatabasePool + ?Sized> DatabasePool for CountingPool<P> {
    async fn fetch_all(&self, sql: &str, params: &[DatabaseValue]) -> OrmResult<Vec<Box<dyn DatabaseRow>>> {
        tracing::trace!(sql, params = params.len(), "fetch_all");
        self.record();
        self.inner.fetch_all(sql, params).await
    }

    async fn fetch_optional(&self, sql: &str, params: &[DatabaseValue]) -> OrmResult<Option<Box<dyn DatabaseRow>>> {
        tracing::trace!(sql, params = params.len(), "fetch_optional");
        self.record();
        self.inner.fetch_optional(sql, params).await
    }

    async fn close(&self) -> OrmResult<()> {
        self.inner.close().await
    }

    async fn health_check(&self) -> OrmResult<Duration> {
        self.inner.health_check().await
    }

    fn sql_dialect(&self) -> SqlDialect {
        self.inner.sql_dialect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::MemoryPool;
    use crate::error::OrmError;

    #[tokio::test]
    async fn test_failed_calls_count_and_reset_returns_previous_value() {
        let inner = Arc::new(MemoryPool::new(|sql, _| {
            if sql == "broken" {
                return Err(OrmError::Query("syntax error".into()));
            }
            Ok(Vec::new())
        }));
        let counting = CountingPool::new(inner);

        counting.fetch_all("SELECT 1", &[]).await.unwrap();
        counting.fetch_optional("SELECT 1", &[]).await.unwrap();
        assert!(counting.fetch_all("broken", &[]).await.is_err());

        assert_eq!(counting.round_trips(), 3);
        assert_eq!(counting.reset(), 3);
        assert_eq!(counting.round_trips(), 0);

        counting.health_check().await.unwrap();
        assert_eq!(counting.round_trips(), 0);
    }
}
