//! Loading helpers shared by the join and batch strategies
//!
//! `grouping` rebuilds parent/child aggregates from flat rows without losing
//! query order; `batch_loader` renders membership queries and runs them in
//! bounded chunks.

pub mod batch_loader;
pub mod grouping;

pub use batch_loader::{distinct_keys, membership_clause, BatchConfig, BatchLoader, BatchQuery, MembershipClause};
pub use grouping::{group_by_key, OrderedGroups};
