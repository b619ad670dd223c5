// Helper structs for sqlx query_as

use chrono::{DateTime, Utc};
use tally_types::{Sale, Salary};

#[derive(sqlx::FromRow)]
pub(crate) struct SaleRow {
    id: i64,
    product_name: String,
    quantity: i32,
    total_amount: f64,
    sale_time: DateTime<Utc>,
}

impl From<SaleRow> for Sale {
    fn from(r: SaleRow) -> Self {
        Sale {
            id: r.id,
            product_name: r.product_name,
            quantity: r.quantity,
            total_amount: r.total_amount,
            sale_time: r.sale_time,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct SalaryRow {
    id: i64,
    employee_name: String,
    department: String,
    salary_amount: f64,
    payment_time: DateTime<Utc>,
}

impl From<SalaryRow> for Salary {
    fn from(r: SalaryRow) -> Self {
        Salary {
            id: r.id,
            employee_name: r.employee_name,
            department: r.department,
            salary_amount: r.salary_amount,
            payment_time: r.payment_time,
        }
    }
}
