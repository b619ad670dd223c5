//! Key-value store items
//!
//! The mirror stores schema-less items: a map of attribute name to a typed
//! attribute value. Typed records convert to and from this shape only at the
//! store boundary (see `SaleItem` and `SalaryItem`).

use crate::decimal::Decimal;
use crate::error::{Result, TypesError};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single attribute value. Numbers are always exact decimals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeValue {
    #[serde(rename = "S")]
    S(String),
    #[serde(rename = "N")]
    N(Decimal),
}

/// Schema-less item as held by the key-value store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Item(BTreeMap<String, AttributeValue>);

impl Item {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_str(mut self, name: &str, value: impl Into<String>) -> Self {
        self.0
            .insert(name.to_string(), AttributeValue::S(value.into()));
        self
    }

    pub fn with_number(mut self, name: &str, value: impl Into<Decimal>) -> Self {
        self.0
            .insert(name.to_string(), AttributeValue::N(value.into()));
        self
    }

    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn string(&self, name: &str) -> Result<String> {
        match self.get(name) {
            Some(AttributeValue::S(s)) => Ok(s.clone()),
            Some(_) => Err(TypesError::AttributeType {
                name: name.to_string(),
                expected: "S",
            }),
            None => Err(TypesError::MissingAttribute(name.to_string())),
        }
    }

    pub fn number(&self, name: &str) -> Result<Decimal> {
        match self.get(name) {
            Some(AttributeValue::N(n)) => Ok(*n),
            Some(_) => Err(TypesError::AttributeType {
                name: name.to_string(),
                expected: "N",
            }),
            None => Err(TypesError::MissingAttribute(name.to_string())),
        }
    }

    /// Numeric attribute that must hold a whole number
    pub fn integer(&self, name: &str) -> Result<i64> {
        self.number(name)?
            .to_i64()
            .ok_or_else(|| TypesError::AttributeType {
                name: name.to_string(),
                expected: "integral N",
            })
    }
}

/// Canonical text form for timestamps stored in the mirror
pub fn iso8601(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}
