use std::sync::Arc;

use nplus1_orm::{
    compare, employee_strategies, order_strategies, BatchConfig, ComparisonReport, DatabasePool, EmployeeFilter,
    OrderFilter,
};

use tracing::warn;

use crate::report;

/// Which domains a comparison covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domains {
    Both,
    OrdersOnly,
    EmployeesOnly,
}

impl Domains {
    pub fn from_flags(orders_only: bool, employees_only: bool) -> Self {
        match (orders_only, employees_only) {
            (true, false) => Domains::OrdersOnly,
            (false, true) => Domains::EmployeesOnly,
            _ => Domains::Both,
        }
    }

    fn orders(&self) -> bool {
        !matches!(self, Domains::EmployeesOnly)
    }

    fn employees(&self) -> bool {
        !matches!(self, Domains::OrdersOnly)
    }
}

/// Run the selected comparisons and collect their reports.
///
/// Strategy failures end up inside the reports; this never fails.
pub async fn run_comparisons(
    pool: Arc<dyn DatabasePool>,
    filter: OrderFilter,
    domains: Domains,
    batch_config: &BatchConfig,
) -> Vec<ComparisonReport> {
    let mut reports = Vec::new();

    if domains.orders() {
        let strategies = order_strategies(batch_config);
        reports.push(compare(Arc::clone(&pool), "Orders with details", &strategies, &filter).await);
    }

    if domains.employees() {
        let strategies = employee_strategies(batch_config);
        reports.push(compare(Arc::clone(&pool), "Employees with department", &strategies, &EmployeeFilter::All).await);
    }

    reports
}

pub async fn run(pool: Arc<dyn DatabasePool>, days: i32, domains: Domains, json: bool) -> anyhow::Result<()> {
    let filter = OrderFilter::last_days(days)?;
    let reports = run_comparisons(pool, filter, domains, &BatchConfig::default()).await;

    if json {
        println!("{}", report::render_json(&reports)?);
    } else {
        for comparison in &reports {
            println!("{}", report::render_comparison(comparison));
        }
    }

    for comparison in reports.iter().filter(|r| !r.all_succeeded()) {
        let failed: Vec<&str> = comparison.failures().map(|r| r.run.name.as_str()).collect();
        warn!(label = %comparison.label, failed = ?failed, "comparison finished with failed strategies");
    }

    Ok(())
}
