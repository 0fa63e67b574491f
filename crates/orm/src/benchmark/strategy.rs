use async_trait::async_trait;
use serde::Serialize;

use crate::backends::DatabasePool;
use crate::error::OrmResult;
use crate::loading::{BatchConfig, BatchLoader};
use crate::repository::{EmployeeFilter, EmployeeRepository, OrderFilter, OrderRepository};

/// One way of assembling aggregates for a filter of type `F`
#[async_trait]
pub trait FetchStrategy<F: Sync + ?Sized>: Send + Sync {
    /// Short identifier used in reports
    fn name(&self) -> &str;

    /// Human readable description
    fn description(&self) -> &str;

    /// Assemble the aggregates and return how many there were
    async fn run(&self, pool: &dyn DatabasePool, filter: &F) -> OrmResult<usize>;
}

/// The three retrieval strategies every domain provides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Naive,
    Join,
    Batch,
}

impl StrategyKind {
    /// Declared run order; the first entry is the baseline
    pub const ALL: [StrategyKind; 3] = [StrategyKind::Naive, StrategyKind::Join, StrategyKind::Batch];

    pub fn name(&self) -> &'static str {
        match self {
            StrategyKind::Naive => "naive",
            StrategyKind::Join => "join",
            StrategyKind::Batch => "batch",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            StrategyKind::Naive => "N+1 queries: one query per parent inside a loop",
            StrategyKind::Join => "single LEFT JOIN query grouped in memory",
            StrategyKind::Batch => "parents, then one IN-list query for all children",
        }
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Order retrieval strategy
#[derive(Debug, Clone)]
pub struct OrderStrategy {
    kind: StrategyKind,
    batch_config: BatchConfig,
}

impl OrderStrategy {
    pub fn with_batch_config(kind: StrategyKind, batch_config: BatchConfig) -> Self {
        Self { kind, batch_config }
    }
}

#[async_trait]
impl FetchStrategy<OrderFilter> for OrderStrategy {
    fn name(&self) -> &str {
        self.kind.name()
    }

    fn description(&self) -> &str {
        self.kind.description()
    }

    async fn run(&self, pool: &dyn DatabasePool, filter: &OrderFilter) -> OrmResult<usize> {
        let repository = OrderRepository::with_batch_loader(pool, BatchLoader::with_config(self.batch_config.clone()));

        let aggregates = match self.kind {
            StrategyKind::Naive => repository.fetch_naive(filter).await?,
            StrategyKind::Join => repository.fetch_join(filter).await?,
            StrategyKind::Batch => repository.fetch_batch(filter).await?,
        };

        Ok(aggregates.len())
    }
}

/// Employee retrieval strategy
#[derive(Debug, Clone)]
pub struct EmployeeStrategy {
    kind: StrategyKind,
    batch_config: BatchConfig,
}

impl EmployeeStrategy {
    pub fn with_batch_config(kind: StrategyKind, batch_config: BatchConfig) -> Self {
        Self { kind, batch_config }
    }
}

#[async_trait]
impl FetchStrategy<EmployeeFilter> for EmployeeStrategy {
    fn name(&self) -> &str {
        self.kind.name()
    }

    fn description(&self) -> &str {
        self.kind.description()
    }

    async fn run(&self, pool: &dyn DatabasePool, filter: &EmployeeFilter) -> OrmResult<usize> {
        let repository =
            EmployeeRepository::with_batch_loader(pool, BatchLoader::with_config(self.batch_config.clone()));

        let aggregates = match self.kind {
            StrategyKind::Naive => repository.fetch_naive(filter).await?,
            StrategyKind::Join => repository.fetch_join(filter).await?,
            StrategyKind::Batch => repository.fetch_batch(filter).await?,
        };

        Ok(aggregates.len())
    }
}

/// Standard order line-up: naive, join, batch
pub fn order_strategies(batch_config: &BatchConfig) -> Vec<Box<dyn FetchStrategy<OrderFilter>>> {
    StrategyKind::ALL
        .into_iter()
        .map(|kind| Box::new(OrderStrategy::with_batch_config(kind, batch_config.clone())) as Box<dyn FetchStrategy<OrderFilter>>)
        .collect()
}

/// Standard employee line-up: naive, join, batch
pub fn employee_strategies(batch_config: &BatchConfig) -> Vec<Box<dyn FetchStrategy<EmployeeFilter>>> {
    StrategyKind::ALL
        .into_iter()
        .map(|kind| {
            Box::new(EmployeeStrategy::with_batch_config(kind, batch_config.clone()))
                as Box<dyn FetchStrategy<EmployeeFilter>>
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_up_starts_with_naive_baseline() {
        let orders = order_strategies(&BatchConfig::default());
        let names: Vec<&str> = orders.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["naive", "join", "batch"]);

        let employees = employee_strategies(&BatchConfig::default());
        assert_eq!(employees[0].name(), "naive");
        assert_eq!(employees.len(), 3);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(StrategyKind::Batch.to_string(), "batch");
        assert!(StrategyKind::Naive.description().contains("N+1"));
    }
}
