//! Repositories for the two demo domains
//!
//! Each repository offers the same three retrieval strategies over an
//! injected `DatabasePool`:
//!
//! - `fetch_naive`: parents, then one query per parent (1 + N round trips)
//! - `fetch_join`: one LEFT JOIN, grouped client-side (1 round trip)
//! - `fetch_batch`: parents, then one membership query (2 round trips, 1 when
//!   there are no parents)
//!
//! All three return the same aggregates in the same order for the same data.

pub mod employees;
pub mod orders;
pub mod sql;
pub mod stats;

pub use employees::{EmployeeFilter, EmployeeRepository};
pub use orders::{OrderFilter, OrderRepository};
pub use stats::{table_counts, CountOutcome, TableCount};
