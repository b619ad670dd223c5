//! Fixed catalogs the generator draws from

use crate::error::TypesError;
use serde::{Deserialize, Serialize};

/// Products a sale can be for
pub const PRODUCTS: &[&str] = &[
    "Laptop Pro",
    "Mouse Wireless",
    "Keyboard Mekanik",
    "Monitor 4K",
    "Webcam HD",
];

/// Departments an employee can be paid from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Department {
    Sales,
    Engineering,
    #[serde(rename = "HR")]
    Hr,
    Marketing,
    Support,
}

impl Department {
    pub const ALL: [Department; 5] = [
        Department::Sales,
        Department::Engineering,
        Department::Hr,
        Department::Marketing,
        Department::Support,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Department::Sales => "Sales",
            Department::Engineering => "Engineering",
            Department::Hr => "HR",
            Department::Marketing => "Marketing",
            Department::Support => "Support",
        }
    }
}

impl std::fmt::Display for Department {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Department {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Department::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| TypesError::UnknownDepartment(s.to_string()))
    }
}
