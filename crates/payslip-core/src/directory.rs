//! Static employee directory
//!
//! Resolves a national id to a display name at write time. Records keep
//! the resolved name, so later directory changes do not rewrite history.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Name stored for national ids missing from the directory
pub const PLACEHOLDER_NAME: &str = "Empleado";

/// A directory entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// National id -> employee, in insertion order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeDirectory {
    entries: IndexMap<String, Employee>,
}

impl EmployeeDirectory {
    /// An empty directory; every lookup yields the placeholder
    pub fn empty() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Add or replace an entry
    pub fn insert(&mut self, national_id: impl Into<String>, employee: Employee) {
        self.entries.insert(national_id.into(), employee);
    }

    pub fn get(&self, national_id: &str) -> Option<&Employee> {
        self.entries.get(national_id)
    }

    /// The name to display for a national id, or the placeholder
    pub fn display_name(&self, national_id: &str) -> &str {
        self.name_or(national_id, PLACEHOLDER_NAME)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The directory name for a national id, or `fallback` when unlisted
    pub fn name_or<'a>(&'a self, national_id: &str, fallback: &'a str) -> &'a str {
        self.get(national_id)
            .map(|e| e.name.as_str())
            .unwrap_or(fallback)
    }
}

impl Default for EmployeeDirectory {
    /// The built-in roster shipped with the portal
    fn default() -> Self {
        let mut directory = Self::empty();
        directory.insert(
            "1234567890",
            Employee {
                name: "Juan Pérez".to_string(),
                email: Some("juan.perez@agropalm.com".to_string()),
            },
        );
        directory.insert(
            "9876543210",
            Employee {
                name: "María García".to_string(),
                email: Some("maria.garcia@agropalm.com".to_string()),
            },
        );
        directory
    }
}
