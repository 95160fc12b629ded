//! Error types for payslip-core

use thiserror::Error;

/// Core error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),

    #[error("Unsupported file type: {0} (expected .xlsx or .xls)")]
    UnsupportedFile(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("IO error: {0}")]
    Io(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
