//! Export payslip metadata to JSON or CSV

use crate::inventory::Inventory;
use crate::{Error, Result};
use chrono::NaiveDate;
use payslip_core::PayslipRecord;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Fixed CSV header
pub const CSV_HEADER: &str = "ID,Name,National ID,Period,File,Size (KB),Uploaded,Status";

/// Export format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// JSON array of metadata objects
    Json,
    /// CSV table with the fixed header
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(Error::UnknownFormat(other.to_string())),
        }
    }
}

/// One exported record. File content is replaced by `has_file`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRow {
    pub id: u64,
    pub employee_name: String,
    pub national_id: String,
    pub period: String,
    pub period_label: String,
    pub file_name: String,
    pub file_size_bytes: u64,
    pub uploaded_at: String,
    pub status: String,
    pub has_file: bool,
}

impl From<&PayslipRecord> for ExportRow {
    fn from(record: &PayslipRecord) -> Self {
        Self {
            id: record.id.raw(),
            employee_name: record.employee_name.clone(),
            national_id: record.national_id.clone(),
            period: record.period.clone(),
            period_label: record.period_label.clone(),
            file_name: record.file_name.clone(),
            file_size_bytes: record.file_size_bytes,
            uploaded_at: record.uploaded_at.clone(),
            status: record.status.to_string(),
            has_file: record.has_content(),
        }
    }
}

/// Exporter over a snapshot of records
pub struct Exporter<'a> {
    records: &'a [PayslipRecord],
}

impl<'a> Exporter<'a> {
    /// Create a new exporter
    pub fn new(records: &'a [PayslipRecord]) -> Self {
        Self { records }
    }

    /// Export to a string in the specified format
    pub fn export(&self, format: ExportFormat) -> Result<String> {
        match format {
            ExportFormat::Json => self.to_json(),
            ExportFormat::Csv => Ok(self.to_csv()),
        }
    }

    /// Export to a writer
    pub fn export_to<W: Write>(&self, writer: &mut W, format: ExportFormat) -> Result<()> {
        let content = self.export(format)?;
        writer
            .write_all(content.as_bytes())
            .map_err(|e| Error::ExportError(e.to_string()))?;
        Ok(())
    }

    /// Write an export file named after `date` into `dir`
    pub fn write_to_dir(
        &self,
        dir: impl AsRef<Path>,
        format: ExportFormat,
        date: NaiveDate,
    ) -> Result<PathBuf> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let path = dir.join(Self::file_name(format, date));
        let mut file = fs::File::create(&path)?;
        self.export_to(&mut file, format)?;
        Ok(path)
    }

    /// Export file name, e.g. `payslips_2024-03-18.csv`
    pub fn file_name(format: ExportFormat, date: NaiveDate) -> String {
        format!("payslips_{}.{}", date.format("%Y-%m-%d"), format.extension())
    }

    /// Metadata rows in store order
    pub fn rows(&self) -> Vec<ExportRow> {
        self.records.iter().map(ExportRow::from).collect()
    }

    /// Export to a pretty-printed JSON array
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.rows()).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Export to CSV
    pub fn to_csv(&self) -> String {
        let mut output = String::new();
        output.push_str(CSV_HEADER);
        output.push('\n');

        for record in self.records {
            let size = if record.file_size_bytes == 0 {
                "N/A".to_string()
            } else {
                format!("{:.2}", record.size_kb())
            };

            output.push_str(&format!(
                "{},{},{},{},{},{},{},{}\n",
                record.id,
                quote(&record.employee_name),
                record.national_id,
                quote(&record.period_label),
                quote(&record.file_name),
                size,
                record.uploaded_at,
                record.status
            ));
        }

        output
    }

    /// Totals for the admin overview
    pub fn inventory(&self) -> Inventory {
        Inventory::from_records(self.records)
    }
}

// Escape CSV fields
fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
