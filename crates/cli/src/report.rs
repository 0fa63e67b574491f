//! Console and JSON rendering of command output

use std::fmt::Write;
use std::time::Duration;

use nplus1_orm::{ComparisonReport, CountOutcome, EmployeeWithDepartment, OrderWithDetails, TableCount};

/// Detail lines shown per sample order before the rest are summarized
pub const SAMPLE_DETAIL_LIMIT: usize = 3;

fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

/// "3.00x faster" or "2.00x slower" for a baseline/strategy ratio
fn relative(speedup: f64) -> String {
    if speedup >= 1.0 || speedup <= 0.0 {
        format!("{:.2}x faster", speedup)
    } else {
        format!("{:.2}x slower", 1.0 / speedup)
    }
}

/// Human readable comparison table
pub fn render_comparison(report: &ComparisonReport) -> String {
    let mut out = String::new();
    let title = format!("📊 {} ({})", report.label, report.filter);
    let _ = writeln!(out, "{}", title);
    let _ = writeln!(out, "{}", "=".repeat(title.chars().count()));

    for (index, result) in report.results.iter().enumerate() {
        let run = &result.run;
        let _ = write!(
            out,
            "  {:<6} {:>10.3} ms  round trips: {:>5}  ",
            run.name,
            millis(run.duration),
            run.round_trips
        );

        match (run.row_count(), run.error()) {
            (Some(rows), _) => {
                let speedup = match (index, result.speedup) {
                    (0, _) => "(baseline)".to_string(),
                    (_, Some(speedup)) => relative(speedup),
                    (_, None) => "n/a".to_string(),
                };
                let _ = writeln!(out, "rows: {:>6}  {}", rows, speedup);
            }
            (None, error) => {
                let _ = writeln!(out, "❌ FAILED: {}", error.unwrap_or("unknown error"));
            }
        }
    }

    if let (Some(best), Some(baseline)) = (report.best(), report.baseline()) {
        let _ = writeln!(
            out,
            "  Best: {} ({} than {})",
            best.run.name,
            relative(best.speedup.unwrap_or(1.0)),
            baseline.run.name
        );
    }

    if let Some(saved) = report.time_saved {
        let _ = writeln!(
            out,
            "  Time saved: {:.3} ms ({:.1}%)",
            millis(saved.duration),
            saved.percent
        );
    }

    if !report.row_counts_agree() {
        let _ = writeln!(out, "  ⚠️  strategies returned different aggregate counts");
    }

    out
}

/// Pretty JSON array of reports
pub fn render_json(reports: &[ComparisonReport]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(reports)
}

pub fn render_order_sample(orders: &[OrderWithDetails], limit: usize) -> String {
    let mut out = String::new();

    if orders.is_empty() {
        let _ = writeln!(out, "  (no orders)");
        return out;
    }

    for aggregate in orders.iter().take(limit) {
        let order = &aggregate.order;
        let _ = writeln!(
            out,
            "  Order #{} | customer {} | {} | total {:.2} | {} detail(s)",
            order.order_id,
            order.customer_id,
            order.order_date,
            order.total_amount,
            aggregate.details.len()
        );

        for detail in aggregate.details.iter().take(SAMPLE_DETAIL_LIMIT) {
            let _ = writeln!(
                out,
                "      - product {} x{} @ {:.2} = {:.2}",
                detail.product_id,
                detail.quantity,
                detail.unit_price,
                detail.line_total()
            );
        }

        if aggregate.details.len() > SAMPLE_DETAIL_LIMIT {
            let _ = writeln!(out, "      ... and {} more", aggregate.details.len() - SAMPLE_DETAIL_LIMIT);
        }
    }

    out
}

pub fn render_employee_sample(employees: &[EmployeeWithDepartment], limit: usize) -> String {
    let mut out = String::new();

    if employees.is_empty() {
        let _ = writeln!(out, "  (no employees)");
        return out;
    }

    for aggregate in employees.iter().take(limit) {
        let employee = &aggregate.employee;
        let department = match &aggregate.department {
            Some(department) => format!("{} ({})", department.department_name, department.location),
            None => format!("no department (id {})", employee.department_id),
        };

        let _ = writeln!(
            out,
            "  Employee #{} {} <{}> | salary {:.2} | {}",
            employee.employee_id,
            employee.full_name(),
            employee.email,
            employee.salary,
            department
        );
    }

    out
}

pub fn render_table_counts(counts: &[TableCount]) -> String {
    let mut out = String::new();

    for count in counts {
        let _ = match &count.outcome {
            CountOutcome::Rows(rows) => writeln!(out, "  {:<14} {:>10}", count.table, rows),
            CountOutcome::Error(error) => writeln!(out, "  {:<14} ❌ {}", count.table, error),
        };
    }

    out
}
