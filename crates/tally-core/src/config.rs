//! Store configuration shared by both binaries
//!
//! Every option can come from the command line or from the environment, so
//! the binaries can be driven entirely by a `.env`-style deployment.

use crate::error::{Result, TallyError};
use crate::mirror::Mirror;
use crate::ports::RecordStore;
use crate::storage::{redis_table, PostgresStore, RedisTable, SqliteStore};
use clap::Args;
use sqlx::postgres::PgConnectOptions;
use std::str::FromStr;
use std::sync::Arc;

/// Relational store connection
#[derive(Debug, Clone, Args)]
pub struct DatabaseArgs {
    /// Full connection URL. `sqlite:` URLs select the embedded backend and
    /// override the host/port/user settings below.
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    #[arg(long, env = "DB_HOST", default_value = "127.0.0.1")]
    pub db_host: String,

    #[arg(long, env = "DB_PORT", default_value_t = 5432)]
    pub db_port: u16,

    #[arg(long, env = "DB_USER", default_value = "postgres")]
    pub db_user: String,

    #[arg(long, env = "DB_PASSWORD", default_value = "", hide_env_values = true)]
    pub db_password: String,

    #[arg(long, env = "DB_NAME", default_value = "tally")]
    pub db_name: String,

    #[arg(long, env = "DB_MAX_CONNECTIONS", default_value_t = 5)]
    pub db_max_connections: u32,
}

impl DatabaseArgs {
    /// Where the store lives, without credentials
    pub fn describe(&self) -> String {
        match self.database_url.as_deref() {
            Some(url) if url.starts_with("sqlite:") => url.to_string(),
            Some(_) => "postgres (DATABASE_URL)".to_string(),
            None => format!(
                "postgres://{}@{}:{}/{}",
                self.db_user, self.db_host, self.db_port, self.db_name
            ),
        }
    }

    /// Opens the connection pool and verifies the store answers
    pub async fn connect(&self) -> Result<Arc<dyn RecordStore>> {
        if self.db_max_connections == 0 {
            return Err(TallyError::InvalidConfig(
                "DB_MAX_CONNECTIONS must be at least 1".to_string(),
            ));
        }

        let store: Arc<dyn RecordStore> = match self.database_url.as_deref() {
            Some(url) if url.starts_with("sqlite:") => {
                Arc::new(SqliteStore::connect(url, self.db_max_connections).await?)
            }
            Some(url) => {
                let options = PgConnectOptions::from_str(url)?;
                Arc::new(PostgresStore::connect(options, self.db_max_connections).await?)
            }
            None => {
                let options = PgConnectOptions::new()
                    .host(&self.db_host)
                    .port(self.db_port)
                    .username(&self.db_user)
                    .password(&self.db_password)
                    .database(&self.db_name);
                Arc::new(PostgresStore::connect(options, self.db_max_connections).await?)
            }
        };

        store.ping().await?;
        Ok(store)
    }
}

/// Key-value mirror connection
#[derive(Debug, Clone, Args)]
pub struct MirrorArgs {
    #[arg(long, env = "REDIS_URL", default_value = "redis://127.0.0.1:6379")]
    pub redis_url: String,

    /// Mirror table holding sale items
    #[arg(long, env = "MIRROR_SALES_TABLE")]
    pub sales_table: String,

    /// Mirror table holding salary items
    #[arg(long, env = "MIRROR_SALARIES_TABLE")]
    pub salaries_table: String,
}

impl MirrorArgs {
    pub fn validate(&self) -> Result<()> {
        if self.sales_table.trim().is_empty() || self.salaries_table.trim().is_empty() {
            return Err(TallyError::InvalidConfig(
                "MIRROR_SALES_TABLE and MIRROR_SALARIES_TABLE must both be set".to_string(),
            ));
        }
        for name in [&self.sales_table, &self.salaries_table] {
            if name.contains(':') {
                return Err(TallyError::InvalidConfig(format!(
                    "Mirror table name '{}' must not contain ':'",
                    name
                )));
            }
        }
        if self.sales_table == self.salaries_table {
            return Err(TallyError::InvalidConfig(
                "Sales and salaries must be mirrored to different tables".to_string(),
            ));
        }
        Ok(())
    }

    pub async fn connect(&self) -> Result<Mirror> {
        self.validate()?;
        let conn = redis_table::connect(&self.redis_url).await?;
        Ok(Mirror::new(
            Arc::new(RedisTable::new(conn.clone(), self.sales_table.clone())),
            Arc::new(RedisTable::new(conn, self.salaries_table.clone())),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        database: DatabaseArgs,
        #[command(flatten)]
        mirror: MirrorArgs,
    }

    #[test]
    fn test_defaults_and_overrides() {
        let cli = TestCli::try_parse_from([
            "test",
            "--sales-table",
            "sales-mirror",
            "--salaries-table",
            "salaries-mirror",
            "--db-host",
            "db.internal",
        ])
        .unwrap();

        assert_eq!(cli.database.db_port, 5432);
        assert_eq!(cli.database.db_max_connections, 5);
        assert_eq!(cli.database.describe(), "postgres://postgres@db.internal:5432/tally");
        assert!(cli.mirror.validate().is_ok());
    }

    #[test]
    fn test_mirror_tables_must_differ() {
        let mirror = MirrorArgs {
            redis_url: "redis://localhost".to_string(),
            sales_table: "items".to_string(),
            salaries_table: "items".to_string(),
        };
        assert!(matches!(mirror.validate(), Err(TallyError::InvalidConfig(_))));

        let mirror = MirrorArgs {
            salaries_table: " ".to_string(),
            ..mirror
        };
        assert!(matches!(mirror.validate(), Err(TallyError::InvalidConfig(_))));
    }

    #[test]
    fn test_mirror_table_names_cannot_nest() {
        // "sales:archive:1" would otherwise fall under the "sales:*" scan
        let mirror = MirrorArgs {
            redis_url: "redis://localhost".to_string(),
            sales_table: "sales".to_string(),
            salaries_table: "sales:archive".to_string(),
        };
        assert!(matches!(mirror.validate(), Err(TallyError::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn test_sqlite_url_selects_embedded_backend() {
        let args = DatabaseArgs {
            database_url: Some("sqlite::memory:".to_string()),
            db_host: String::new(),
            db_port: 0,
            db_user: String::new(),
            db_password: String::new(),
            db_name: String::new(),
            db_max_connections: 1,
        };
        assert_eq!(args.describe(), "sqlite::memory:");

        let store = args.connect().await.unwrap();
        store.ensure_schema().await.unwrap();
        assert!(store.recent_sales(1).await.unwrap().is_empty());
    }
}
