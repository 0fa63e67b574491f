//! # nplus1-orm: retrieval strategies for related records
//!
//! Assembles orders with their detail lines and employees with their
//! department three ways (N+1 lookups, a single outer join, and a batched
//! IN-list load) and times them against each other.
//!
//! This crate provides the database abstraction, row mapping, batch loading,
//! the two repositories and the comparison harness used by the `nplus1` CLI.

pub mod backends;
pub mod benchmark;
pub mod connection;
pub mod error;
pub mod loading;
pub mod models;
pub mod repository;

// Re-export core traits and types
pub use backends::{
    DatabaseBackend, DatabasePool, DatabasePoolConfig, DatabaseRow, DatabaseRowExt, DatabaseValue, PostgresBackend,
    PostgresPool, SqlDialect,
};
#[cfg(any(test, feature = "testing"))]
pub use backends::{MemoryPool, MemoryRow};
pub use benchmark::{
    compare, employee_strategies, order_strategies, ComparisonReport, FetchStrategy, StrategyKind,
    StrategyResult, StrategyRun,
};
pub use connection::CountingPool;
pub use error::{OrmError, OrmResult};
pub use loading::{BatchConfig, BatchLoader};
pub use models::*;
pub use repository::*;
