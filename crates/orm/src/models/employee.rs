use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Aggregate, FromDatabaseRow};
use crate::backends::{DatabaseRow, DatabaseRowExt};
use crate::error::OrmResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub employee_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department_id: i64,
    pub hire_date: NaiveDate,
    pub salary: f64,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    pub department_id: i64,
    pub department_name: String,
    pub location: String,
}

/// An employee and the department its `department_id` points at.
///
/// `department` is `None` when no department row has that id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeWithDepartment {
    pub employee: Employee,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub department: Option<Department>,
}

impl Aggregate for EmployeeWithDepartment {
    fn parent_key(&self) -> i64 {
        self.employee.employee_id
    }

    fn association_count(&self) -> usize {
        usize::from(self.department.is_some())
    }
}

// employee_id, first_name, last_name, email, department_id, hire_date, salary
impl FromDatabaseRow for Employee {
    fn from_row(row: &dyn DatabaseRow) -> OrmResult<Self> {
        Ok(Employee {
            employee_id: row.get("employee_id")?,
            first_name: row.get("first_name")?,
            last_name: row.get("last_name")?,
            email: row.get("email")?,
            department_id: row.get("department_id")?,
            hire_date: row.get("hire_date")?,
            salary: row.get("salary")?,
        })
    }
}

// department_id, department_name, location
impl FromDatabaseRow for Department {
    fn from_row(row: &dyn DatabaseRow) -> OrmResult<Self> {
        Ok(Department {
            department_id: row.get("department_id")?,
            department_name: row.get("department_name")?,
            location: row.get("location")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee() -> Employee {
        Employee {
            employee_id: 10,
            first_name: "Aiko".to_string(),
            last_name: "Sato".to_string(),
            email: "aiko.sato@example.com".to_string(),
            department_id: 99,
            hire_date: NaiveDate::from_ymd_opt(2020, 4, 1).unwrap(),
            salary: 5200.0,
        }
    }

    #[test]
    fn test_absent_department_is_omitted_from_json() {
        let aggregate = EmployeeWithDepartment {
            employee: employee(),
            department: None,
        };

        let json = serde_json::to_value(&aggregate).unwrap();
        assert!(json.get("department").is_none());
        assert_eq!(aggregate.association_count(), 0);
        assert_eq!(aggregate.parent_key(), 10);
    }

    #[test]
    fn test_full_name() {
        assert_eq!(employee().full_name(), "Aiko Sato");
    }
}
