//! Sale records

use crate::decimal::{serialize_as_f64, Decimal};
use crate::error::{Result, TypesError};
use crate::item::{iso8601, Item};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A sale that has not been committed yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewSale {
    pub product_name: String,
    pub quantity: i32,
    pub total_amount: f64,
    pub sale_time: DateTime<Utc>,
}

/// A committed row of the `sales` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub id: i64,
    pub product_name: String,
    pub quantity: i32,
    pub total_amount: f64,
    pub sale_time: DateTime<Utc>,
}

/// Mirror copy of a committed sale
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaleItem {
    pub sale_id: i64,
    pub product_name: String,
    pub quantity: i32,
    #[serde(serialize_with = "serialize_as_f64")]
    pub total_amount: Decimal,
    pub sale_time: String,
}

impl SaleItem {
    pub fn from_sale(sale: &Sale) -> Result<Self> {
        Ok(Self {
            sale_id: sale.id,
            product_name: sale.product_name.clone(),
            quantity: sale.quantity,
            total_amount: Decimal::from_f64(sale.total_amount)?,
            sale_time: iso8601(&sale.sale_time),
        })
    }

    /// Key the item is stored under in its mirror table
    pub fn key(&self) -> String {
        self.sale_id.to_string()
    }

    pub fn to_item(&self) -> Item {
        Item::new()
            .with_number("sale_id", self.sale_id)
            .with_str("product_name", self.product_name.clone())
            .with_number("quantity", self.quantity)
            .with_number("total_amount", self.total_amount)
            .with_str("sale_time", self.sale_time.clone())
    }
}

impl TryFrom<&Item> for SaleItem {
    type Error = TypesError;

    fn try_from(item: &Item) -> Result<Self> {
        let quantity = item.integer("quantity")?;
        Ok(Self {
            sale_id: item.integer("sale_id")?,
            product_name: item.string("product_name")?,
            quantity: i32::try_from(quantity).map_err(|_| TypesError::AttributeType {
                name: "quantity".to_string(),
                expected: "32-bit N",
            })?,
            total_amount: item.number("total_amount")?,
            sale_time: item.string("sale_time")?,
        })
    }
}
