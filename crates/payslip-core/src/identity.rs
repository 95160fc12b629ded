//! Identity types for stored payslips

use serde::{Deserialize, Serialize};
use std::fmt;

/// Surrogate key assigned by the store on insert
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl RecordId {
    /// Create a new record ID
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The `(national_id, period)` pair that identifies a payslip by policy
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PayslipKey {
    pub national_id: String,
    pub period: String,
}

impl PayslipKey {
    /// Create a new compound key
    pub fn new(national_id: impl Into<String>, period: impl Into<String>) -> Self {
        Self {
            national_id: national_id.into(),
            period: period.into(),
        }
    }

    /// Check whether a record's fields match this key exactly
    pub fn matches(&self, national_id: &str, period: &str) -> bool {
        self.national_id == national_id && self.period == period
    }
}

impl fmt::Display for PayslipKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.national_id, self.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id() {
        let id = RecordId::new(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(format!("{}", id), "42");
    }

    #[test]
    fn test_key_matches_exactly() {
        let key = PayslipKey::new("1234567890", "primera-2024-03");
        assert!(key.matches("1234567890", "primera-2024-03"));
        assert!(!key.matches("123456789", "primera-2024-03"));
        assert!(!key.matches("1234567890", "otra-clave"));
        assert_eq!(key.to_string(), "1234567890/primera-2024-03");
    }
}
