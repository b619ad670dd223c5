//! In-memory mirror table using DashMap (stands in for Redis in tests)

use crate::ports::MirrorTable;
use crate::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use tally_types::Item;

pub struct MemoryTable {
    name: String,
    items: DashMap<String, Item>,
}

impl MemoryTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: DashMap::new(),
        }
    }

    /// Get an item by key
    pub fn get(&self, key: &str) -> Option<Item> {
        self.items.get(key).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[async_trait]
impl MirrorTable for MemoryTable {
    fn name(&self) -> &str {
        &self.name
    }

    async fn put(&self, key: &str, item: &Item) -> Result<()> {
        self.items.insert(key.to_string(), item.clone());
        Ok(())
    }

    async fn scan(&self, limit: usize) -> Result<Vec<Item>> {
        Ok(self
            .items
            .iter()
            .take(limit)
            .map(|entry| entry.value().clone())
            .collect())
    }
}
