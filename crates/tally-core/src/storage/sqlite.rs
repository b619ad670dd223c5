//! SQLite record store (embedded, no external server)

use crate::ports::{CommittedIds, RecordStore};
use crate::storage::rows::{SaleRow, SalaryRow};
use crate::Result;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{SqliteConnection, SqlitePool};
use std::str::FromStr;
use tally_types::{NewSale, NewSalary, Sale, Salary};

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        tracing::info!("Opening SQLite database at: {}", url);

        let in_memory = url.contains(":memory:") || url.contains("mode=memory");
        let mut options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        if !in_memory {
            options = options
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal);
        }

        // An in-memory database lives and dies with its single connection
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections)
        };

        let pool = pool_options.connect_with(options).await?;
        tracing::info!("SQLite connection established");

        Ok(Self { pool })
    }

    async fn insert_rows(
        conn: &mut SqliteConnection,
        sale: &NewSale,
        salary: &NewSalary,
    ) -> Result<CommittedIds> {
        let salary_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO salaries (employee_name, department, salary_amount, payment_time)
            VALUES (?1, ?2, ?3, ?4)
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
            VALUES (?1, ?2, ?3, ?4)
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
impl RecordStore for SqliteStore {
    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS sales (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                product_name TEXT NOT NULL,
                quantity INTEGER NOT NULL,
                total_amount REAL NOT NULL,
                sale_time DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS salaries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                employee_name TEXT NOT NULL,
                department TEXT NOT NULL,
                salary_amount REAL NOT NULL,
                payment_time DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
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
            FROM sales WHERE id = ?1
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
            FROM salaries WHERE id = ?1
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
            LIMIT ?1
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
            LIMIT ?1
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&mut *conn)
        .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }
}
