//! Redis mirror table
//!
//! Each item is stored as JSON under `<table>:<key>`. Scans walk `SCAN MATCH
//! <table>:*` until enough keys are collected, then fetch them with one `MGET`.

use crate::ports::MirrorTable;
use crate::Result;
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tally_types::Item;

/// Opens a managed connection and verifies it with `PING`
pub async fn connect(url: &str) -> Result<ConnectionManager> {
    tracing::info!("Connecting to Redis at: {}", url);
    let client = redis::Client::open(url)?;
    let mut conn = ConnectionManager::new(client).await?;
    let _: String = redis::cmd("PING").query_async(&mut conn).await?;
    tracing::info!("Redis connection established");
    Ok(conn)
}

pub struct RedisTable {
    conn: ConnectionManager,
    name: String,
}

impl RedisTable {
    pub fn new(conn: ConnectionManager, name: impl Into<String>) -> Self {
        Self {
            conn,
            name: name.into(),
        }
    }
}

fn storage_key(table: &str, key: &str) -> String {
    format!("{}:{}", table, key)
}

/// `SCAN MATCH` pattern for every key of `table`, with glob characters in the
/// name escaped
fn scan_pattern(table: &str) -> String {
    let mut pattern = String::with_capacity(table.len() + 2);
    for c in table.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push_str(":*");
    pattern
}

fn decode_payloads(table: &str, payloads: Vec<Option<String>>) -> Vec<Item> {
    // Keys can expire or vanish between SCAN and MGET
    payloads
        .into_iter()
        .flatten()
        .filter_map(|payload| match serde_json::from_str::<Item>(&payload) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!("Skipping undecodable item in {}: {}", table, e);
                None
            }
        })
        .collect()
}

#[async_trait]
impl MirrorTable for RedisTable {
    fn name(&self) -> &str {
        &self.name
    }

    async fn put(&self, key: &str, item: &Item) -> Result<()> {
        let payload = serde_json::to_string(item)?;
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(storage_key(&self.name, key), payload)
            .await?;
        Ok(())
    }

    async fn scan(&self, limit: usize) -> Result<Vec<Item>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let mut conn = self.conn.clone();
        let pattern = scan_pattern(&self.name);
        let mut keys: Vec<String> = Vec::new();
        let mut cursor: u64 = 0;
        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(limit)
                .query_async(&mut conn)
                .await?;
            keys.extend(batch);
            if next == 0 || keys.len() >= limit {
                break;
            }
            cursor = next;
        }
        keys.truncate(limit);

        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let payloads: Vec<Option<String>> =
            redis::cmd("MGET").arg(&keys).query_async(&mut conn).await?;

        Ok(decode_payloads(&self.name, payloads))
    }
}
