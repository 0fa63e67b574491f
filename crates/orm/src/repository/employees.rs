//! Employees and their department (many-to-one)

use std::collections::HashMap;

use super::sql;
use crate::backends::{DatabasePool, DatabaseRow, DatabaseRowExt, DatabaseValue};
use crate::error::OrmResult;
use crate::loading::{distinct_keys, BatchLoader, OrderedGroups};
use crate::models::{Department, Employee, EmployeeWithDepartment, FromDatabaseRow};

/// Employee selection; the demo always reads the whole table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmployeeFilter {
    #[default]
    All,
}

impl std::fmt::Display for EmployeeFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmployeeFilter::All => write!(f, "all employees"),
        }
    }
}

/// Employee repository over an injected pool
pub struct EmployeeRepository<'a> {
    pool: &'a dyn DatabasePool,
    batch_loader: BatchLoader,
}

impl<'a> EmployeeRepository<'a> {
    pub fn new(pool: &'a dyn DatabasePool) -> Self {
        Self::with_batch_loader(pool, BatchLoader::new())
    }

    pub fn with_batch_loader(pool: &'a dyn DatabasePool, batch_loader: BatchLoader) -> Self {
        Self { pool, batch_loader }
    }

    /// Every employee, ordered by `employee_id`
    pub async fn employees(&self, _filter: &EmployeeFilter) -> OrmResult<Vec<Employee>> {
        let rows = self
            .pool
            .fetch_all(sql::ALL_EMPLOYEES, &[])
            .await
            .map_err(|e| e.context("failed to execute employees query"))?;

        rows.iter()
            .map(|row| Employee::from_row(row.as_ref()).map_err(|e| e.context("failed to scan employee row")))
            .collect()
    }

    /// Department with `department_id`, or `None` when there is no such row
    pub async fn department(&self, department_id: i64) -> OrmResult<Option<Department>> {
        let row = self
            .pool
            .fetch_optional(sql::DEPARTMENT_BY_ID, &[DatabaseValue::Int64(department_id)])
            .await
            .map_err(|e| e.context("failed to query department"))?;

        row.map(|row| Department::from_row(row.as_ref()).map_err(|e| e.context("failed to scan department row")))
            .transpose()
    }

    /// Departments whose id is in `department_ids`, ordered by id
    pub async fn departments(&self, department_ids: &[i64]) -> OrmResult<Vec<Department>> {
        self.batch_loader
            .load(self.pool, &sql::DEPARTMENTS_BY_IDS, department_ids)
            .await
    }

    /// N+1 retrieval: one query for the employees, then one department lookup per employee.
    pub async fn fetch_naive(&self, filter: &EmployeeFilter) -> OrmResult<Vec<EmployeeWithDepartment>> {
        let employees = self
            .employees(filter)
            .await
            .map_err(|e| e.context("failed to get employees"))?;

        let mut result = Vec::with_capacity(employees.len());
        for employee in employees {
            let department = self.department(employee.department_id).await.map_err(|e| {
                e.context(format!("failed to get department for employee {}", employee.employee_id))
            })?;

            result.push(EmployeeWithDepartment { employee, department });
        }

        Ok(result)
    }

    /// Single LEFT JOIN query.
    pub async fn fetch_join(&self, _filter: &EmployeeFilter) -> OrmResult<Vec<EmployeeWithDepartment>> {
        let rows = self
            .pool
            .fetch_all(sql::EMPLOYEES_WITH_DEPARTMENT_JOIN, &[])
            .await
            .map_err(|e| e.context("failed to execute employee join query"))?;

        let mut groups: OrderedGroups<i64, EmployeeWithDepartment> = OrderedGroups::with_capacity(rows.len());
        for row in &rows {
            let row = row.as_ref();
            let employee_id: i64 = row
                .get("employee_id")
                .map_err(|e| e.context("failed to scan employee row"))?;

            groups
                .get_or_try_insert_with(employee_id, || {
                    Ok(EmployeeWithDepartment {
                        employee: Employee::from_row(row)?,
                        department: department_from_join_row(row)?,
                    })
                })
                .map_err(|e| e.context("failed to scan employee row"))?;
        }

        Ok(groups.into_values())
    }

    /// Two queries: the employees, then their distinct departments through one IN list.
    pub async fn fetch_batch(&self, filter: &EmployeeFilter) -> OrmResult<Vec<EmployeeWithDepartment>> {
        let employees = self
            .employees(filter)
            .await
            .map_err(|e| e.context("failed to get employees"))?;

        if employees.is_empty() {
            return Ok(Vec::new());
        }

        // Many employees share a department; bind each id once
        let department_ids = distinct_keys(employees.iter().map(|employee| employee.department_id));

        let departments = self
            .departments(&department_ids)
            .await
            .map_err(|e| e.context("failed to get departments"))?;

        let departments_by_id: HashMap<i64, Department> = departments
            .into_iter()
            .map(|department| (department.department_id, department))
            .collect();

        Ok(employees
            .into_iter()
            .map(|employee| {
                let department = departments_by_id.get(&employee.department_id).cloned();
                EmployeeWithDepartment { employee, department }
            })
            .collect())
    }
}

/// Department half of a join row; `None` when the outer join matched nothing
fn department_from_join_row(row: &dyn DatabaseRow) -> OrmResult<Option<Department>> {
    let Some(department_id) = row.try_get::<i64>("joined_department_id")? else {
        return Ok(None);
    };

    Ok(Some(Department {
        department_id,
        department_name: row.get("department_name")?,
        location: row.get("location")?,
    }))
}
