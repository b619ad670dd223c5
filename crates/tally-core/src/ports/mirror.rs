//! Key-value store port

use crate::Result;
use async_trait::async_trait;
use tally_types::Item;

/// One table of the key-value mirror
#[async_trait]
pub trait MirrorTable: Send + Sync {
    fn name(&self) -> &str;

    /// Stores `item` under `key`, replacing any previous item
    async fn put(&self, key: &str, item: &Item) -> Result<()>;

    /// Up to `limit` items in the store's native scan order
    async fn scan(&self, limit: usize) -> Result<Vec<Item>>;
}
