//! Salary records

use crate::catalog::Department;
use crate::decimal::{serialize_as_f64, Decimal};
use crate::error::{Result, TypesError};
use crate::item::{iso8601, Item};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A salary payment that has not been committed yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewSalary {
    pub employee_name: String,
    pub department: Department,
    pub salary_amount: f64,
    pub payment_time: DateTime<Utc>,
}

/// A committed row of the `salaries` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Salary {
    pub id: i64,
    pub employee_name: String,
    pub department: String,
    pub salary_amount: f64,
    pub payment_time: DateTime<Utc>,
}

/// Mirror copy of a committed salary payment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalaryItem {
    pub salary_id: i64,
    pub employee_name: String,
    pub department: String,
    #[serde(serialize_with = "serialize_as_f64")]
    pub salary_amount: Decimal,
    pub payment_time: String,
}

impl SalaryItem {
    pub fn from_salary(salary: &Salary) -> Result<Self> {
        Ok(Self {
            salary_id: salary.id,
            employee_name: salary.employee_name.clone(),
            department: salary.department.clone(),
            salary_amount: Decimal::from_f64(salary.salary_amount)?,
            payment_time: iso8601(&salary.payment_time),
        })
    }

    pub fn key(&self) -> String {
        self.salary_id.to_string()
    }

    pub fn to_item(&self) -> Item {
        Item::new()
            .with_number("salary_id", self.salary_id)
            .with_str("employee_name", self.employee_name.clone())
            .with_str("department", self.department.clone())
            .with_number("salary_amount", self.salary_amount)
            .with_str("payment_time", self.payment_time.clone())
    }
}

impl TryFrom<&Item> for SalaryItem {
    type Error = TypesError;

    fn try_from(item: &Item) -> Result<Self> {
        Ok(Self {
            salary_id: item.integer("salary_id")?,
            employee_name: item.string("employee_name")?,
            department: item.string("department")?,
            salary_amount: item.number("salary_amount")?,
            payment_time: item.string("payment_time")?,
        })
    }
}
