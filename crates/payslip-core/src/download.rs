//! Download reconstruction
//!
//! A download hands back the stored bytes untouched under the original
//! file name.

use crate::record::PayslipRecord;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// MIME type offered with every download
pub const SPREADSHEET_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// A file ready to hand back to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadArtifact {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl DownloadArtifact {
    /// Rebuild the original upload from a stored record
    pub fn from_record(record: &PayslipRecord) -> Self {
        let file_name = if record.file_name.trim().is_empty() {
            format!("Payslip_{}_{}.xlsx", record.national_id, record.period)
        } else {
            record.file_name.clone()
        };

        Self {
            file_name,
            content_type: SPREADSHEET_CONTENT_TYPE,
            bytes: record.file_content.clone(),
        }
    }

    /// Write the artifact into `dir`, returning the full path
    pub fn write_to(&self, dir: impl AsRef<Path>) -> io::Result<PathBuf> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        // Only the final component; stored names never choose the directory.
        let name = Path::new(&self.file_name)
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "payslip.xlsx".into());
        let path = dir.join(name);
        fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}
