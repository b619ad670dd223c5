//! PostgreSQL record store

use crate::ports::{CommittedIds, RecordStore};
use crate::storage::rows::{SaleRow, SalaryRow};
use crate::Result;
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{PgConnection, PgPool};
use std::time::Duration;
use tally_types::{NewSale, NewSalary, Sale, Salary};

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub async fn connect(options: PgConnectOptions, max_connections: u32) -> Result<Self> {
        tracing::info!("Connecting to PostgreSQL...");

        // Validate pooled connections on checkout
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .test_before_acquire(true)
            .connect_with(options)
            .await?;

        tracing::info!("PostgreSQL connection established");
        Ok(Self { pool })
    }

    async fn insert_rows(
        conn: &mut PgConnection,
        sale: &NewSale,
        salary: &NewSalary,
    ) -> Result<CommittedIds> {
        let salary_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO salaries (employee_name, department, salary_amount, payment_time)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&salary.employee_name)
        .bind(salary.department.as_str())
        .bind(salary.salary_amount)
        .bind(salary.payment_time)
        .fetch_one(&mut *conn)
        .await?;

        let sale_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO sales (product_name, quantity, total_amount, sale_time)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&sale.product_name)
        .bind(sale.quantity)
        .bind(sale.total_amount)
        .bind(sale.sale_time)
        .fetch_one(&mut *conn)
        .await?;

        Ok(CommittedIds { sale_id, salary_id })
    }
}

#[async_trait]
impl RecordStore for PostgresStore {
    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS sales (
                id BIGSERIAL PRIMARY KEY,
                product_name VARCHAR(100) NOT NULL,
                quantity INTEGER NOT NULL,
                total_amount DOUBLE PRECISION NOT NULL,
                sale_time TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS salaries (
                id BIGSERIAL PRIMARY KEY,
                employee_name VARCHAR(100) NOT NULL,
                department VARCHAR(50) NOT NULL,
                salary_amount DOUBLE PRECISION NOT NULL,
                payment_time TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn insert_pair(&self, sale: &NewSale, salary: &NewSalary) -> Result<CommittedIds> {
        let mut tx = self.pool.begin().await?;
        match Self::insert_rows(&mut tx, sale, salary).await {
            Ok(ids) => {
                tx.commit().await?;
                Ok(ids)
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::warn!("Rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }

    async fn get_sale(&self, id: i64) -> Result<Option<Sale>> {
        let row: Option<SaleRow> = sqlx::query_as(
            r#"
            SELECT id, product_name, quantity, total_amount, sale_time
            FROM sales WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into()))
    }

    async fn get_salary(&self, id: i64) -> Result<Option<Salary>> {
        let row: Option<SalaryRow> = sqlx::query_as(
            r#"
            SELECT id, employee_name, department, salary_amount, payment_time
            FROM salaries WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into()))
    }

    async fn recent_sales(&self, limit: u32) -> Result<Vec<Sale>> {
        let mut conn = self.pool.acquire().await?;
        let rows: Vec<SaleRow> = sqlx::query_as(
            r#"
            SELECT id, product_name, quantity, total_amount, sale_time
            FROM sales
            ORDER BY id DESC
            LIMIT $1
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&mut *conn)
        .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn recent_salaries(&self, limit: u32) -> Result<Vec<Salary>> {
        let mut conn = self.pool.acquire().await?;
        let rows: Vec<SalaryRow> = sqlx::query_as(
            r#"
            SELECT id, employee_name, department, salary_amount, payment_time
            FROM salaries
            ORDER BY id DESC
            LIMIT $1
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&mut *conn)
        .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }
}
