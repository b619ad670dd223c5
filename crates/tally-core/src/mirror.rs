//! Typed facade over the two mirror tables

use crate::ports::MirrorTable;
use crate::Result;
use std::sync::Arc;
use tally_types::{SaleItem, SalaryItem};

/// The key-value copy of sales and salaries.
///
/// Writes and reads go through the typed item records; the raw [`tally_types::Item`]
/// shape never leaves this module.
#[derive(Clone)]
pub struct Mirror {
    sales: Arc<dyn MirrorTable>,
    salaries: Arc<dyn MirrorTable>,
}

impl Mirror {
    pub fn new(sales: Arc<dyn MirrorTable>, salaries: Arc<dyn MirrorTable>) -> Self {
        Self { sales, salaries }
    }

    pub fn sales_table(&self) -> &str {
        self.sales.name()
    }

    pub fn salaries_table(&self) -> &str {
        self.salaries.name()
    }

    pub async fn put_sale(&self, item: &SaleItem) -> Result<()> {
        self.sales.put(&item.key(), &item.to_item()).await
    }

    pub async fn put_salary(&self, item: &SalaryItem) -> Result<()> {
        self.salaries.put(&item.key(), &item.to_item()).await
    }

    /// Up to `limit` sales in scan order. Items that no longer decode are skipped.
    pub async fn recent_sales(&self, limit: usize) -> Result<Vec<SaleItem>> {
        let items = self.sales.scan(limit).await?;
        Ok(items
            .iter()
            .filter_map(|item| match SaleItem::try_from(item) {
                Ok(sale) => Some(sale),
                Err(e) => {
                    tracing::warn!("Skipping malformed item in {}: {}", self.sales.name(), e);
                    None
                }
            })
            .collect())
    }

    pub async fn recent_salaries(&self, limit: usize) -> Result<Vec<SalaryItem>> {
        let items = self.salaries.scan(limit).await?;
        Ok(items
            .iter()
            .filter_map(|item| match SalaryItem::try_from(item) {
                Ok(salary) => Some(salary),
                Err(e) => {
                    tracing::warn!(
                        "Skipping malformed item in {}: {}",
                        self.salaries.name(),
                        e
                    );
                    None
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryTable;
    use crate::MirrorTable;
    use tally_types::{Decimal, Item};

    fn sale_item(id: i64) -> SaleItem {
        SaleItem {
            sale_id: id,
            product_name: "Monitor 4K".to_string(),
            quantity: 2,
            total_amount: Decimal::from_cents(350000099),
            sale_time: "2024-02-02T10:00:00.000000Z".to_string(),
        }
    }

    #[tokio::test]
    async fn test_items_land_in_their_own_table() {
        let sales = Arc::new(MemoryTable::new("sales"));
        let salaries = Arc::new(MemoryTable::new("salaries"));
        let mirror = Mirror::new(sales.clone(), salaries.clone());

        mirror.put_sale(&sale_item(9)).await.unwrap();
        assert_eq!(sales.len(), 1);
        assert!(salaries.is_empty());
        assert_eq!(
            sales.get("9").unwrap().number("total_amount").unwrap(),
            "3500000.99".parse::<Decimal>().unwrap()
        );

        let read = mirror.recent_sales(10).await.unwrap();
        assert_eq!(read, vec![sale_item(9)]);
    }

    #[tokio::test]
    async fn test_malformed_items_are_skipped() {
        let sales = Arc::new(MemoryTable::new("sales"));
        let mirror = Mirror::new(sales.clone(), Arc::new(MemoryTable::new("salaries")));

        mirror.put_sale(&sale_item(1)).await.unwrap();
        sales
            .put("2", &Item::new().with_str("product_name", "orphan"))
            .await
            .unwrap();

        let read = mirror.recent_sales(10).await.unwrap();
        assert_eq!(read.len(), 1);
        assert_eq!(read[0].sale_id, 1);
    }
}
