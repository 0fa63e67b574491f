//! Strategy comparison harness
//!
//! Runs a fixed line-up of retrieval strategies once each against the same
//! filter, naive first as the baseline, and reports wall-clock time, aggregate
//! count and round trips for every strategy along with its speed-up over the
//! baseline.

pub mod harness;
pub mod report;
pub mod strategy;

pub use harness::compare;
pub use report::{speedup, ComparisonReport, RunOutcome, StrategyResult, StrategyRun, TimeSaved};
pub use strategy::{
    employee_strategies, order_strategies, EmployeeStrategy, FetchStrategy, OrderStrategy, StrategyKind,
};
