//! Comparison results
//!
//! Durations serialize as fractional milliseconds.

use std::time::Duration;

use serde::{Serialize, Serializer};

fn duration_ms<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64() * 1000.0)
}

/// What a single strategy run produced
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    Succeeded { row_count: usize },
    Failed { error: String },
}

/// One timed strategy execution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyRun {
    pub name: String,
    pub description: String,
    #[serde(rename = "duration_ms", serialize_with = "duration_ms")]
    pub duration: Duration,
    pub round_trips: u64,
    #[serde(flatten)]
    pub outcome: RunOutcome,
}

impl StrategyRun {
    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, RunOutcome::Succeeded { .. })
    }

    pub fn row_count(&self) -> Option<usize> {
        match self.outcome {
            RunOutcome::Succeeded { row_count } => Some(row_count),
            RunOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            RunOutcome::Failed { error } => Some(error),
            RunOutcome::Succeeded { .. } => None,
        }
    }
}

/// A run together with its speed-up over the baseline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyResult {
    #[serde(flatten)]
    pub run: StrategyRun,
    pub speedup: Option<f64>,
}

/// Wall-clock time the best strategy saved against the baseline
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeSaved {
    #[serde(rename = "duration_ms", serialize_with = "duration_ms")]
    pub duration: Duration,
    pub percent: f64,
}

/// Results of one comparison, baseline first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub label: String,
    pub filter: String,
    pub results: Vec<StrategyResult>,
    pub best: Option<String>,
    pub time_saved: Option<TimeSaved>,
}

/// `baseline / strategy`, or `None` when the ratio is undefined
pub fn speedup(baseline: Duration, strategy: Duration) -> Option<f64> {
    if strategy.is_zero() {
        return None;
    }
    Some(baseline.as_secs_f64() / strategy.as_secs_f64())
}

impl ComparisonReport {
    /// Build a report from runs in execution order; the first run is the baseline.
    pub fn from_runs(label: impl Into<String>, filter: impl Into<String>, runs: Vec<StrategyRun>) -> Self {
        let baseline = runs.first().filter(|run| run.succeeded()).map(|run| run.duration);

        let results: Vec<StrategyResult> = runs
            .into_iter()
            .map(|run| {
                let speedup = match baseline {
                    Some(baseline) if run.succeeded() => speedup(baseline, run.duration),
                    _ => None,
                };
                StrategyResult { run, speedup }
            })
            .collect();

        let best_index = results
            .iter()
            .enumerate()
            .skip(1)
            .filter_map(|(index, result)| result.speedup.map(|speedup| (index, speedup)))
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index);

        let time_saved = match (baseline, best_index) {
            (Some(baseline), Some(index)) if results[index].run.duration < baseline => {
                let duration = baseline - results[index].run.duration;
                Some(TimeSaved {
                    duration,
                    percent: duration.as_secs_f64() / baseline.as_secs_f64() * 100.0,
                })
            }
            _ => None,
        };

        Self {
            label: label.into(),
            filter: filter.into(),
            best: best_index.map(|index| results[index].run.name.clone()),
            results,
            time_saved,
        }
    }

    pub fn baseline(&self) -> Option<&StrategyResult> {
        self.results.first()
    }

    /// Fastest non-baseline strategy with a defined speed-up
    pub fn best(&self) -> Option<&StrategyResult> {
        let name = self.best.as_deref()?;
        self.results.iter().skip(1).find(|result| result.run.name == name)
    }

    pub fn result(&self, name: &str) -> Option<&StrategyResult> {
        self.results.iter().find(|result| result.run.name == name)
    }

    pub fn failures(&self) -> impl Iterator<Item = &StrategyResult> {
        self.results.iter().filter(|result| !result.run.succeeded())
    }

    pub fn all_succeeded(&self) -> bool {
        self.failures().next().is_none()
    }

    /// True when every successful run assembled the same number of aggregates
    pub fn row_counts_agree(&self) -> bool {
        let mut counts = self.results.iter().filter_map(|result| result.run.row_count());
        match counts.next() {
            Some(first) => counts.all(|count| count == first),
            None => true,
        }
    }
}
