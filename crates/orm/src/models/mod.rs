//! Domain models
//!
//! Plain entities mapped from rows, and the read-only aggregates the
//! retrieval strategies assemble from them.

pub mod employee;
pub mod order;

pub use employee::{Department, Employee, EmployeeWithDepartment};
pub use order::{Order, OrderDetail, OrderWithDetails};

use crate::backends::DatabaseRow;
use crate::error::OrmResult;

/// Explicit column mapping for one query shape
pub trait FromDatabaseRow: Sized {
    fn from_row(row: &dyn DatabaseRow) -> OrmResult<Self>;
}

/// Aggregate built by a retrieval strategy: one parent plus its associations
pub trait Aggregate {
    /// Key of the single parent this aggregate holds
    fn parent_key(&self) -> i64;

    /// Number of associated rows attached to the parent
    fn association_count(&self) -> usize;
}
