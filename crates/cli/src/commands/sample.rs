use nplus1_orm::{DatabasePool, EmployeeFilter, EmployeeRepository, OrderFilter, OrderRepository};
use tracing::warn;

use crate::report;

/// Print a few assembled aggregates from each domain using the join strategy.
///
/// A domain whose count is zero is skipped without querying. A domain that
/// cannot be loaded is reported and the other is still shown.
pub async fn run(pool: &dyn DatabasePool, orders: usize, employees: usize, days: i32) -> anyhow::Result<()> {
    let filter = OrderFilter::last_days(days)?;
    print!("{}", render(pool, orders, employees, &filter).await);
    Ok(())
}

async fn render(pool: &dyn DatabasePool, orders: usize, employees: usize, filter: &OrderFilter) -> String {
    let mut sections = Vec::new();

    if orders > 0 {
        let body = match OrderRepository::new(pool).fetch_join(filter).await {
            Ok(aggregates) => report::render_order_sample(&aggregates, orders),
            Err(e) => {
                warn!(error = %e, "failed to load sample orders");
                format!("  ❌ {}\n", e)
            }
        };
        sections.push(format!("📦 Sample orders ({})\n{}", filter, body));
    }

    if employees > 0 {
        let body = match EmployeeRepository::new(pool).fetch_join(&EmployeeFilter::All).await {
            Ok(aggregates) => report::render_employee_sample(&aggregates, employees),
            Err(e) => {
                warn!(error = %e, "failed to load sample employees");
                format!("  ❌ {}\n", e)
            }
        };
        sections.push(format!("👥 Sample employees ({})\n{}", EmployeeFilter::All, body));
    }

    sections.join("\n")
}
