//! Tally Types - Pure record definitions
//!
//! Records shared by the generator and the query service: the relational rows,
//! the key-value mirror items, and the exact decimal used to carry amounts
//! between the two stores.

pub mod catalog;
pub mod decimal;
pub mod error;
pub mod item;
pub mod sale;
pub mod salary;

pub use catalog::*;
pub use decimal::Decimal;
pub use error::{Result, TypesError};
pub use item::{iso8601, AttributeValue, Item};
pub use sale::*;
pub use salary::*;
