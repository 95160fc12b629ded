//! Upload intake
//!
//! The whole file is held in memory; content is never inspected beyond the
//! file name's extension.

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// File extensions accepted for payslip spreadsheets
pub const ACCEPTED_EXTENSIONS: [&str; 2] = [".xlsx", ".xls"];

/// A spreadsheet selected for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    name: String,
    content: Vec<u8>,
}

impl UploadedFile {
    /// Accept a file by name and content, checking only the extension
    pub fn new(name: impl Into<String>, content: Vec<u8>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::MissingField("file"));
        }
        if !has_accepted_extension(&name) {
            return Err(Error::UnsupportedFile(name));
        }
        Ok(Self { name, content })
    }

    /// Read a file from disk, keeping only its final path component as the name
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let content =
            fs::read(path).map_err(|e| Error::Io(format!("{}: {}", path.display(), e)))?;
        Self::new(name, content)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }

    pub fn into_parts(self) -> (String, Vec<u8>) {
        (self.name, self.content)
    }
}

fn has_accepted_extension(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    ACCEPTED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}
