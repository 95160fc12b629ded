//! Bookkeeping rows: schema version and key generator.

use native_db::*;
use native_model::{native_model, Model};
use serde::{Deserialize, Serialize};

/// Primary key of the single schema row.
pub const SCHEMA_ROW: &str = "schema";

/// Primary key of the payslip id sequence.
pub const PAYSLIP_SEQUENCE: &str = "payslip";

/// Stored schema version.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 50, version = 1)]
#[native_db]
pub struct StoredSchemaMeta {
    /// Always "schema" - single row.
    #[primary_key]
    pub name: String,
    /// Schema version the data was last written at.
    pub version: u32,
}

impl StoredSchemaMeta {
    pub fn new(version: u32) -> Self {
        Self {
            name: SCHEMA_ROW.to_string(),
            version,
        }
    }
}

/// Stored key generator state.
///
/// Never reset by deletes or clears, so ids are not reused.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 51, version = 1)]
#[native_db]
pub struct StoredSequence {
    /// Sequence name.
    #[primary_key]
    pub name: String,
    /// Last id handed out.
    pub last: u64,
}
