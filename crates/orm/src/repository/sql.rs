//! Statements issued by the repositories
//!
//! Money columns are cast to `float8` in the select lists so that NUMERIC
//! schemas decode without a decimal type. Every statement orders by parent
//! key, then child key.

use crate::loading::BatchQuery;

pub const ORDERS_BY_DAYS: &str = "SELECT order_id, customer_id, order_date, total_amount::float8 AS total_amount \
     FROM orders \
     WHERE order_date >= CURRENT_DATE - $1::int \
     ORDER BY order_id";

pub const DETAILS_BY_ORDER_ID: &str = "SELECT detail_id, order_id, product_id, quantity, unit_price::float8 AS unit_price \
     FROM order_details \
     WHERE order_id = $1 \
     ORDER BY detail_id";

pub const ORDERS_WITH_DETAILS_JOIN: &str = "SELECT o.order_id, o.customer_id, o.order_date, o.total_amount::float8 AS total_amount, \
     od.detail_id, od.product_id, od.quantity, od.unit_price::float8 AS unit_price \
     FROM orders o \
     LEFT JOIN order_details od ON o.order_id = od.order_id \
     WHERE o.order_date >= CURRENT_DATE - $1::int \
     ORDER BY o.order_id, od.detail_id";

pub const DETAILS_BY_ORDER_IDS: BatchQuery = BatchQuery {
    select: "SELECT detail_id, order_id, product_id, quantity, unit_price::float8 AS unit_price FROM order_details",
    key_column: "order_id",
    order_by: Some("order_id, detail_id"),
};

pub const ALL_EMPLOYEES: &str = "SELECT employee_id, first_name, last_name, email, department_id, hire_date, salary::float8 AS salary \
     FROM employees \
     ORDER BY employee_id";

pub const DEPARTMENT_BY_ID: &str = "SELECT department_id, department_name, location \
     FROM departments \
     WHERE department_id = $1";

pub const EMPLOYEES_WITH_DEPARTMENT_JOIN: &str = "SELECT e.employee_id, e.first_name, e.last_name, e.email, e.department_id, e.hire_date, \
     e.salary::float8 AS salary, \
     d.department_id AS joined_department_id, d.department_name, d.location \
     FROM employees e \
     LEFT JOIN departments d ON e.department_id = d.department_id \
     ORDER BY e.employee_id";

pub const DEPARTMENTS_BY_IDS: BatchQuery = BatchQuery {
    select: "SELECT department_id, department_name, location FROM departments",
    key_column: "department_id",
    order_by: Some("department_id"),
};

/// Tables reported by the statistics command
pub const COUNTED_TABLES: [&str; 4] = ["orders", "order_details", "employees", "departments"];

/// Row count statement for one of `COUNTED_TABLES`
pub fn count_rows(table: &str) -> String {
    format!("SELECT COUNT(*) AS row_count FROM {}", table)
}
