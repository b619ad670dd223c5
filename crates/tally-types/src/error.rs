//! Error types for record conversion

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TypesError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypesError {
    #[error("Invalid decimal: {0}")]
    InvalidDecimal(String),

    #[error("Decimal out of range: {0}")]
    DecimalOverflow(String),

    #[error("Amount is not a finite number: {0}")]
    NonFinite(String),

    #[error("Missing attribute: {0}")]
    MissingAttribute(String),

    #[error("Attribute {name} has the wrong type, expected {expected}")]
    AttributeType { name: String, expected: &'static str },

    #[error("Unknown department: {0}")]
    UnknownDepartment(String),
}
