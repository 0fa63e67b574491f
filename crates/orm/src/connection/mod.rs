//! Connection instrumentation

pub mod statistics;

pub use statistics::CountingPool;
