//! Payslip models, one per schema version.
//!
//! V1 carries the `national_id` and `period` indexes. V2 adds the compound
//! `national_id_period` index; the row shape is otherwise identical, so the
//! migration is a straight field copy.

use native_db::db_type::ToInput;
use native_db::*;
use native_model::{native_model, Model};
use payslip_core::{PayslipKey, PayslipRecord, RecordId, Status};
use serde::{Deserialize, Serialize};

/// Separator inside the compound index value.
const KEY_SEPARATOR: char = '\u{1f}';

/// Value stored in the compound index for a `(national_id, period)` pair.
pub fn compound_key(national_id: &str, period: &str) -> String {
    format!("{national_id}{KEY_SEPARATOR}{period}")
}

/// Row operations shared by every payslip model version.
pub trait PayslipRow: ToInput + Sized {
    fn from_record(record: PayslipRecord) -> Self;
    fn into_record(self) -> PayslipRecord;
    fn matches(&self, key: &PayslipKey) -> bool;
}

/// Stored payslip, schema v1.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 1, version = 1)]
#[native_db]
pub struct StoredPayslipV1 {
    /// Primary key - store-assigned id.
    #[primary_key]
    pub id: u64,
    /// Employee national id (non-unique).
    #[secondary_key]
    pub national_id: String,
    /// Period key (non-unique).
    #[secondary_key]
    pub period: String,
    pub period_label: String,
    pub employee_name: String,
    pub uploaded_at: String,
    pub file_name: String,
    pub file_size_bytes: u64,
    /// Original file bytes.
    pub file_content: Vec<u8>,
    pub status: Status,
}

/// Stored payslip, schema v2.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 1, version = 2, from = StoredPayslipV1)]
#[native_db(secondary_key(national_id_period -> String))]
pub struct StoredPayslip {
    /// Primary key - store-assigned id.
    #[primary_key]
    pub id: u64,
    /// Employee national id (non-unique).
    #[secondary_key]
    pub national_id: String,
    /// Period key (non-unique).
    #[secondary_key]
    pub period: String,
    pub period_label: String,
    pub employee_name: String,
    pub uploaded_at: String,
    pub file_name: String,
    pub file_size_bytes: u64,
    /// Original file bytes.
    pub file_content: Vec<u8>,
    pub status: Status,
}

impl StoredPayslip {
    /// Compound index value. Not unique at the index level.
    fn national_id_period(&self) -> String {
        compound_key(&self.national_id, &self.period)
    }
}

impl From<StoredPayslipV1> for StoredPayslip {
    fn from(v1: StoredPayslipV1) -> Self {
        Self {
            id: v1.id,
            national_id: v1.national_id,
            period: v1.period,
            period_label: v1.period_label,
            employee_name: v1.employee_name,
            uploaded_at: v1.uploaded_at,
            file_name: v1.file_name,
            file_size_bytes: v1.file_size_bytes,
            file_content: v1.file_content,
            status: v1.status,
        }
    }
}

impl From<StoredPayslip> for StoredPayslipV1 {
    fn from(v2: StoredPayslip) -> Self {
        Self {
            id: v2.id,
            national_id: v2.national_id,
            period: v2.period,
            period_label: v2.period_label,
            employee_name: v2.employee_name,
            uploaded_at: v2.uploaded_at,
            file_name: v2.file_name,
            file_size_bytes: v2.file_size_bytes,
            file_content: v2.file_content,
            status: v2.status,
        }
    }
}

impl PayslipRow for StoredPayslipV1 {
    fn from_record(record: PayslipRecord) -> Self {
        Self {
            id: record.id.raw(),
            national_id: record.national_id,
            period: record.period,
            period_label: record.period_label,
            employee_name: record.employee_name,
            uploaded_at: record.uploaded_at,
            file_name: record.file_name,
            file_size_bytes: record.file_size_bytes,
            file_content: record.file_content,
            status: record.status,
        }
    }

    fn into_record(self) -> PayslipRecord {
        PayslipRecord {
            id: RecordId::new(self.id),
            national_id: self.national_id,
            period: self.period,
            period_label: self.period_label,
            employee_name: self.employee_name,
            uploaded_at: self.uploaded_at,
            file_name: self.file_name,
            file_size_bytes: self.file_size_bytes,
            file_content: self.file_content,
            status: self.status,
        }
    }

    fn matches(&self, key: &PayslipKey) -> bool {
        key.matches(&self.national_id, &self.period)
    }
}

impl PayslipRow for StoredPayslip {
    fn from_record(record: PayslipRecord) -> Self {
        StoredPayslipV1::from_record(record).into()
    }

    fn into_record(self) -> PayslipRecord {
        StoredPayslipV1::from(self).into_record()
    }

    fn matches(&self, key: &PayslipKey) -> bool {
        key.matches(&self.national_id, &self.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compound_key_is_unambiguous() {
        assert_ne!(compound_key("12", "3-x"), compound_key("123", "-x"));
        assert!(compound_key("1", "p").starts_with('1'));
    }

    #[test]
    fn test_migration_copies_every_field() {
        let v1 = StoredPayslipV1 {
            id: 9,
            national_id: "1234567890".to_string(),
            period: "primera-2024-03".to_string(),
            period_label: "Primera Quincena Marzo 2024".to_string(),
            employee_name: "Juan Pérez".to_string(),
            uploaded_at: "18/03/2024".to_string(),
            file_name: "marzo.xlsx".to_string(),
            file_size_bytes: 2,
            file_content: vec![1, 2],
            status: Status::Processed,
        };

        let v2 = StoredPayslip::from(v1.clone());
        assert_eq!(v2.national_id_period(), compound_key("1234567890", "primera-2024-03"));
        assert_eq!(v2.clone().into_record(), v1.into_record());
    }

    #[test]
    fn test_row_matches_exact_key() {
        let record = StoredPayslipV1 {
            id: 1,
            national_id: "1234567890".to_string(),
            period: "primera-2024-03".to_string(),
            period_label: String::new(),
            employee_name: String::new(),
            uploaded_at: String::new(),
            file_name: "a.xlsx".to_string(),
            file_size_bytes: 0,
            file_content: Vec::new(),
            status: Status::Processed,
        }
        .into_record();
        let row = StoredPayslip::from_record(record);

        assert!(row.matches(&PayslipKey::new("1234567890", "primera-2024-03")));
        assert!(!row.matches(&PayslipKey::new("123456789", "primera-2024-03")));
        assert!(!row.matches(&PayslipKey::new("1234567890", "primera-2024-0")));
    }
}
