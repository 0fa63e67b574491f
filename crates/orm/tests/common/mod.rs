//! In-memory demo schema answering the repository statements
#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use nplus1_orm::repository::sql;
use nplus1_orm::{DatabaseValue, Department, Employee, MemoryPool, MemoryRow, Order, OrderDetail, OrmError, OrmResult};

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub orders: Vec<Order>,
    pub details: Vec<OrderDetail>,
    pub employees: Vec<Employee>,
    pub departments: Vec<Department>,
}

pub fn days_ago(days: i64) -> NaiveDate {
    Utc::now().date_naive() - Duration::days(days)
}

pub fn order(order_id: i64, days_old: i64) -> Order {
    Order {
        order_id,
        customer_id: 100 + order_id,
        order_date: days_ago(days_old),
        total_amount: 10.0 * order_id as f64,
    }
}

pub fn detail(detail_id: i64, order_id: i64) -> OrderDetail {
    OrderDetail {
        detail_id,
        order_id,
        product_id: 500 + detail_id,
        quantity: 2,
        unit_price: 4.25,
    }
}

pub fn employee(employee_id: i64, department_id: i64) -> Employee {
    Employee {
        employee_id,
        first_name: format!("First{}", employee_id),
        last_name: format!("Last{}", employee_id),
        email: format!("employee{}@example.com", employee_id),
        department_id,
        hire_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
        salary: 50_000.0 + employee_id as f64,
    }
}

pub fn department(department_id: i64, name: &str) -> Department {
    Department {
        department_id,
        department_name: name.to_string(),
        location: format!("Floor {}", department_id),
    }
}

impl Dataset {
    /// Orders 1 (details a, b), 2 (none) and 3 (detail c), all recent
    pub fn orders_scenario() -> Self {
        Self {
            orders: vec![order(1, 1), order(2, 2), order(3, 3)],
            details: vec![detail(11, 1), detail(31, 3), detail(12, 1)],
            ..Self::default()
        }
    }

    /// Five employees across two departments plus one dangling department id
    pub fn employees_scenario() -> Self {
        Self {
            employees: vec![
                employee(1, 10),
                employee(2, 20),
                employee(3, 10),
                employee(4, 99),
                employee(5, 20),
            ],
            departments: vec![department(20, "Research"), department(10, "Sales")],
            ..Self::default()
        }
    }

    /// Random data for `seed`: orders spread over 60 days with zero to three
    /// details each, and employees sharing a few departments, some of them
    /// pointing at a department that does not exist
    pub fn generated(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);

        let mut orders = Vec::new();
        let mut details = Vec::new();
        for order_id in 1..=rng.gen_range(0..40) {
            orders.push(order(order_id, rng.gen_range(0..60)));
            for _ in 0..rng.gen_range(0..4) {
                details.push(detail(details.len() as i64 + 1, order_id));
            }
        }
        orders.shuffle(&mut rng);
        details.shuffle(&mut rng);

        let departments: Vec<Department> = (1..=rng.gen_range(1..6))
            .map(|n| department(n * 10, &format!("Dept{}", n)))
            .collect();
        let mut department_ids: Vec<i64> = departments.iter().map(|d| d.department_id).collect();
        department_ids.push(999);

        let employees = (1..=rng.gen_range(0..40))
            .map(|employee_id| {
                let department_id = department_ids.choose(&mut rng).copied().unwrap_or(999);
                employee(employee_id, department_id)
            })
            .collect();

        Self {
            orders,
            details,
            employees,
            departments,
        }
    }

    pub fn pool(self) -> MemoryPool {
        let data = Arc::new(self);
        MemoryPool::new(move |statement, params| data.answer(statement, params))
    }

    pub fn answer(&self, statement: &str, params: &[DatabaseValue]) -> OrmResult<Vec<MemoryRow>> {
        if statement == sql::ORDERS_BY_DAYS {
            return Ok(self.recent_orders(days_param(params)?).map(order_row).collect());
        }
        if statement == sql::DETAILS_BY_ORDER_ID {
            let order_id = key_param(params.first())?;
            return Ok(self
                .sorted_details()
                .into_iter()
                .filter(|d| d.order_id == order_id)
                .map(detail_row)
                .collect());
        }
        if statement == sql::ORDERS_WITH_DETAILS_JOIN {
            return Ok(self.order_join_rows(days_param(params)?));
        }
        if statement == sql::ALL_EMPLOYEES {
            let mut employees = self.employees.clone();
            employees.sort_by_key(|e| e.employee_id);
            return Ok(employees.iter().map(employee_row).collect());
        }
        if statement == sql::DEPARTMENT_BY_ID {
            let department_id = key_param(params.first())?;
            return Ok(self
                .departments
                .iter()
                .filter(|d| d.department_id == department_id)
                .map(department_row)
                .collect());
        }
        if statement == sql::EMPLOYEES_WITH_DEPARTMENT_JOIN {
            return Ok(self.employee_join_rows());
        }
        if statement.starts_with(sql::DETAILS_BY_ORDER_IDS.select) {
            let keys = key_set(params)?;
            return Ok(self
                .sorted_details()
                .into_iter()
                .filter(|d| keys.contains(&d.order_id))
                .map(detail_row)
                .collect());
        }
        if statement.starts_with(sql::DEPARTMENTS_BY_IDS.select) {
            let keys = key_set(params)?;
            let mut departments: Vec<&Department> =
                self.departments.iter().filter(|d| keys.contains(&d.department_id)).collect();
            departments.sort_by_key(|d| d.department_id);
            return Ok(departments.into_iter().map(department_row).collect());
        }

        Err(OrmError::Query(format!("unexpected statement: {}", statement)))
    }

    fn recent_orders(&self, days: i64) -> impl Iterator<Item = &Order> {
        let cutoff = days_ago(days);
        let mut orders: Vec<&Order> = self.orders.iter().filter(|o| o.order_date >= cutoff).collect();
        orders.sort_by_key(|o| o.order_id);
        orders.into_iter()
    }

    fn sorted_details(&self) -> Vec<&OrderDetail> {
        let mut details: Vec<&OrderDetail> = self.details.iter().collect();
        details.sort_by_key(|d| (d.order_id, d.detail_id));
        details
    }

    fn order_join_rows(&self, days: i64) -> Vec<MemoryRow> {
        let details = self.sorted_details();
        let mut rows = Vec::new();

        for order in self.recent_orders(days) {
            let mut matched = details.iter().filter(|d| d.order_id == order.order_id).peekable();
            if matched.peek().is_none() {
                rows.push(
                    order_row(order)
                        .with("detail_id", DatabaseValue::Null)
                        .with("product_id", DatabaseValue::Null)
                        .with("quantity", DatabaseValue::Null)
                        .with("unit_price", DatabaseValue::Null),
                );
            }
            for detail in matched {
                rows.push(
                    order_row(order)
                        .with("detail_id", detail.detail_id)
                        .with("product_id", detail.product_id)
                        .with("quantity", detail.quantity)
                        .with("unit_price", detail.unit_price),
                );
            }
        }

        rows
    }

    fn employee_join_rows(&self) -> Vec<MemoryRow> {
        let mut employees = self.employees.clone();
        employees.sort_by_key(|e| e.employee_id);

        employees
            .iter()
            .map(|employee| {
                let row = employee_row(employee);
                match self.departments.iter().find(|d| d.department_id == employee.department_id) {
                    Some(department) => row
                        .with("joined_department_id", department.department_id)
                        .with("department_name", department.department_name.as_str())
                        .with("location", department.location.as_str()),
                    None => row
                        .with("joined_department_id", DatabaseValue::Null)
                        .with("department_name", DatabaseValue::Null)
                        .with("location", DatabaseValue::Null),
                }
            })
            .collect()
    }
}

fn days_param(params: &[DatabaseValue]) -> OrmResult<i64> {
    match params.first() {
        Some(DatabaseValue::Int32(days)) => Ok(i64::from(*days)),
        other => Err(OrmError::Query(format!("expected days parameter, got {:?}", other))),
    }
}

fn key_param(param: Option<&DatabaseValue>) -> OrmResult<i64> {
    match param {
        Some(DatabaseValue::Int64(key)) => Ok(*key),
        other => Err(OrmError::Query(format!("expected key parameter, got {:?}", other))),
    }
}

fn key_set(params: &[DatabaseValue]) -> OrmResult<HashSet<i64>> {
    params.iter().map(|p| key_param(Some(p))).collect()
}

fn order_row(order: &Order) -> MemoryRow {
    MemoryRow::new()
        .with("order_id", order.order_id)
        .with("customer_id", order.customer_id)
        .with("order_date", order.order_date)
        .with("total_amount", order.total_amount)
}

fn detail_row(detail: &OrderDetail) -> MemoryRow {
    MemoryRow::new()
        .with("detail_id", detail.detail_id)
        .with("order_id", detail.order_id)
        .with("product_id", detail.product_id)
        .with("quantity", detail.quantity)
        .with("unit_price", detail.unit_price)
}

fn employee_row(employee: &Employee) -> MemoryRow {
    MemoryRow::new()
        .with("employee_id", employee.employee_id)
        .with("first_name", employee.first_name.as_str())
        .with("last_name", employee.last_name.as_str())
        .with("email", employee.email.as_str())
        .with("department_id", employee.department_id)
        .with("hire_date", employee.hire_date)
        .with("salary", employee.salary)
}

fn department_row(department: &Department) -> MemoryRow {
    MemoryRow::new()
        .with("department_id", department.department_id)
        .with("department_name", department.department_name.as_str())
        .with("location", department.location.as_str())
}
