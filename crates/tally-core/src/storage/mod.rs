//! Storage layer
//!
//! Relational backends: PostgreSQL for deployments, SQLite (embedded) for local
//! runs and tests. Mirror backends: Redis, and a DashMap table for tests.

pub mod memory;
pub mod postgres;
pub mod redis_table;
mod rows;
pub mod sqlite;

pub use memory::MemoryTable;
pub use postgres::PostgresStore;
pub use redis_table::RedisTable;
pub use sqlite::SqliteStore;

/// Rows returned by a detailed report
pub const REPORT_LIMIT: u32 = 100;
