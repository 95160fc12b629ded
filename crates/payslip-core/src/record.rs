//! Payslip records

use crate::directory::EmployeeDirectory;
use crate::error::{Error, Result};
use crate::identity::{PayslipKey, RecordId};
use crate::period::Period;
use crate::upload::UploadedFile;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Date format used for `uploaded_at` (day/month/year)
pub const UPLOAD_DATE_FORMAT: &str = "%d/%m/%Y";

/// Processing status of a record
///
/// Records never transition; every stored payslip is `Processed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Processed,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Processed => "Processed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A payslip waiting to be written. The store assigns the id.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPayslip {
    pub national_id: String,
    pub period: String,
    pub period_label: String,
    pub employee_name: String,
    pub uploaded_at: String,
    pub file_name: String,
    pub file_size_bytes: u64,
    pub file_content: Vec<u8>,
    pub status: Status,
}

impl NewPayslip {
    /// Build a pending write from an upload.
    ///
    /// The employee name is resolved from the directory and the period label
    /// and upload date are rendered now; none of them are recomputed later.
    pub fn from_upload(
        national_id: &str,
        period: &Period,
        file: UploadedFile,
        directory: &EmployeeDirectory,
        uploaded_on: NaiveDate,
    ) -> Result<Self> {
        let national_id = national_id.trim();
        if national_id.is_empty() {
            return Err(Error::MissingField("national_id"));
        }

        let (file_name, file_content) = file.into_parts();
        Ok(Self {
            national_id: national_id.to_string(),
            period: period.key(),
            period_label: period.label(),
            employee_name: directory.display_name(national_id).to_string(),
            uploaded_at: uploaded_on.format(UPLOAD_DATE_FORMAT).to_string(),
            file_size_bytes: file_content.len() as u64,
            file_name,
            file_content,
            status: Status::Processed,
        })
    }

    /// The compound key this payslip will occupy
    pub fn key(&self) -> PayslipKey {
        PayslipKey::new(self.national_id.clone(), self.period.clone())
    }

    /// Attach the store-assigned id
    pub fn into_record(self, id: RecordId) -> PayslipRecord {
        PayslipRecord {
            id,
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
}

impl fmt::Debug for NewPayslip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewPayslip")
            .field("national_id", &self.national_id)
            .field("period", &self.period)
            .field("file_name", &self.file_name)
            .field("file_size_bytes", &self.file_size_bytes)
            .finish_non_exhaustive()
    }
}

/// One stored upload plus its metadata. Immutable once written.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayslipRecord {
    pub id: RecordId,
    pub national_id: String,
    pub period: String,
    pub period_label: String,
    pub employee_name: String,
    pub uploaded_at: String,
    pub file_name: String,
    pub file_size_bytes: u64,
    /// Original spreadsheet bytes, unmodified
    pub file_content: Vec<u8>,
    pub status: Status,
}

impl PayslipRecord {
    pub fn key(&self) -> PayslipKey {
        PayslipKey::new(self.national_id.clone(), self.period.clone())
    }

    pub fn has_content(&self) -> bool {
        !self.file_content.is_empty()
    }

    /// Size in kilobytes, as shown in listings and exports
    pub fn size_kb(&self) -> f64 {
        self.file_size_bytes as f64 / 1024.0
    }
}

impl fmt::Debug for PayslipRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PayslipRecord")
            .field("id", &self.id)
            .field("national_id", &self.national_id)
            .field("period", &self.period)
            .field("employee_name", &self.employee_name)
            .field("file_name", &self.file_name)
            .field("file_size_bytes", &self.file_size_bytes)
            .finish_non_exhaustive()
    }
}
