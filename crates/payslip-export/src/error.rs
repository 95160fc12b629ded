//! Error types for payslip-export

use thiserror::Error;

/// Export error type
#[derive(Debug, Error)]
pub enum Error {
    /// Unknown export format name
    #[error("Unknown export format: {0}")]
    UnknownFormat(String),

    /// Export error
    #[error("Export error: {0}")]
    ExportError(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for export operations
pub type Result<T> = std::result::Result<T, Error>;
