//! Sequential strategy runner

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use super::report::{ComparisonReport, RunOutcome, StrategyRun};
use super::strategy::FetchStrategy;
use crate::backends::DatabasePool;
use crate::connection::CountingPool;

/// Run every strategy once, in order, against `filter`.
///
/// Each run is timed from just before it starts to just after it returns.
/// A strategy that fails is recorded as failed and the remaining strategies
/// still run. Round trips are counted per strategy through a `CountingPool`.
pub async fn compare<F>(
    pool: Arc<dyn DatabasePool>,
    label: &str,
    strategies: &[Box<dyn FetchStrategy<F>>],
    filter: &F,
) -> ComparisonReport
where
    F: std::fmt::Display + Sync + ?Sized,
{
    let counting = CountingPool::new(pool);
    let mut runs = Vec::with_capacity(strategies.len());

    info!(label, filter = %filter, strategies = strategies.len(), "starting comparison");

    for strategy in strategies {
        counting.reset();

        let start = Instant::now();
        let result = strategy.run(&counting, filter).await;
        let duration = start.elapsed();
        let round_trips = counting.round_trips();

        let outcome = match result {
            Ok(row_count) => {
                info!(
                    label,
                    strategy = strategy.name(),
                    duration_ms = duration.as_secs_f64() * 1000.0,
                    row_count,
                    round_trips,
                    "strategy finished"
                );
                RunOutcome::Succeeded { row_count }
            }
            Err(error) => {
                warn!(
                    label,
                    strategy = strategy.name(),
                    round_trips,
                    error = %error,
                    "strategy failed"
                );
                RunOutcome::Failed {
                    error: error.to_string(),
                }
            }
        };

        runs.push(StrategyRun {
            name: strategy.name().to_string(),
            description: strategy.description().to_string(),
            duration,
            round_trips,
            outcome,
        });
    }

    ComparisonReport::from_runs(label, filter.to_string(), runs)
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::backends::MemoryPool;
    use crate::error::{OrmError, OrmResult};

    struct Scripted {
        name: &'static str,
        queries: usize,
        fail: bool,
    }

    #[async_trait]
    impl FetchStrategy<str> for Scripted {
        fn name(&self) -> &str {
            self.name
        }

        fn description(&self) -> &str {
            "scripted"
        }

        async fn run(&self, pool: &dyn DatabasePool, _filter: &str) -> OrmResult<usize> {
            for _ in 0..self.queries {
                pool.fetch_all("SELECT 1", &[]).await?;
            }
            if self.fail {
                return Err(OrmError::Query("boom".into()));
            }
            Ok(self.queries)
        }
    }

    #[tokio::test]
    async fn test_failure_is_isolated_and_round_trips_reset() {
        let pool: Arc<dyn DatabasePool> = Arc::new(MemoryPool::new(|_, _| Ok(Vec::new())));
        let strategies: Vec<Box<dyn FetchStrategy<str>>> = vec![
            Box::new(Scripted { name: "naive", queries: 4, fail: false }),
            Box::new(Scripted { name: "join", queries: 1, fail: true }),
            Box::new(Scripted { name: "batch", queries: 2, fail: false }),
        ];

        let report = compare(pool, "scripted", &strategies, "everything").await;

        assert_eq!(report.filter, "everything");
        let round_trips: Vec<u64> = report.results.iter().map(|r| r.run.round_trips).collect();
        assert_eq!(round_trips, vec![4, 1, 2]);

        let join = report.result("join").unwrap();
        assert_eq!(join.run.error(), Some("Query error: boom"));
        assert!(join.speedup.is_none());
        assert_eq!(report.result("batch").unwrap().run.row_count(), Some(2));
    }
}
