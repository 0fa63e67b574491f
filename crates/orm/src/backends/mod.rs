//! Database Backend Abstractions
//!
//! The strategies only see the `DatabasePool` trait. `PostgresBackend` is the
//! production implementation; `MemoryPool` is a scripted stand-in for tests.

pub mod core;
#[cfg(any(test, feature = "testing"))]
pub mod memory;
pub mod postgres;

pub use self::core::*;
#[cfg(any(test, feature = "testing"))]
pub use memory::{MemoryPool, MemoryRow, RecordedQuery};
pub use postgres::{PostgresBackend, PostgresPool, PostgresRow};
