//! Relational store port

use crate::Result;
use async_trait::async_trait;
use tally_types::{NewSale, NewSalary, Sale, Salary};

/// Identifiers the relational store assigned on commit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommittedIds {
    pub sale_id: i64,
    pub salary_id: i64,
}

/// Authoritative, transactional store for sales and salaries
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Round trip to the store; fails if it cannot be reached
    async fn ping(&self) -> Result<()>;

    /// Creates the `sales` and `salaries` tables if they are absent
    async fn ensure_schema(&self) -> Result<()>;

    /// Inserts both records in a single transaction.
    ///
    /// On any error the transaction is rolled back and nothing is persisted.
    async fn insert_pair(&self, sale: &NewSale, salary: &NewSalary) -> Result<CommittedIds>;

    async fn get_sale(&self, id: i64) -> Result<Option<Sale>>;
    async fn get_salary(&self, id: i64) -> Result<Option<Salary>>;

    /// Newest rows first, at most `limit`
    async fn recent_sales(&self, limit: u32) -> Result<Vec<Sale>>;
    async fn recent_salaries(&self, limit: u32) -> Result<Vec<Salary>>;
}
