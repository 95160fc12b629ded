//! Error types for database operations.

use payslip_core::{PayslipKey, RecordId};
use thiserror::Error;

/// Failures opening or upgrading the store. Fatal to the session.
#[derive(Debug, Error)]
pub enum OpenError {
    /// The database file could not be created or opened.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The schema upgrade aborted.
    #[error("schema upgrade from v{from} to v{to} failed: {reason}")]
    Upgrade { from: u32, to: u32, reason: String },

    /// The file was written by a newer schema.
    #[error("store is at schema v{stored}, cannot open at v{requested}")]
    Downgrade { stored: u32, requested: u32 },
}

/// Errors that can occur during database operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Store could not be opened.
    #[error(transparent)]
    Open(#[from] OpenError),

    /// A write transaction aborted. The caller may retry.
    #[error("Write failed: {0}")]
    Write(String),

    /// A payslip already exists for this key.
    #[error("Duplicate payslip for {0}")]
    Duplicate(PayslipKey),

    /// Record not found.
    #[error("Payslip not found: {0}")]
    NotFound(RecordId),

    /// The database file could not be deleted.
    #[error("Could not delete store: {0}")]
    Destroy(String),

    /// Native DB error outside a write.
    #[error("Database error: {0}")]
    Database(String),

    /// Domain validation error.
    #[error(transparent)]
    Domain(#[from] payslip_core::Error),
}

impl Error {
    pub(crate) fn write(err: native_db::db_type::Error) -> Self {
        Error::Write(err.to_string())
    }

    /// Reclassify a storage failure that happened inside a write transaction.
    pub(crate) fn into_write(self) -> Self {
        match self {
            Error::Database(msg) => Error::Write(msg),
            other => other,
        }
    }

    /// The conflicting key, if this is a duplicate rejection.
    pub fn duplicate_key(&self) -> Option<&PayslipKey> {
        match self {
            Error::Duplicate(key) => Some(key),
            _ => None,
        }
    }

    /// Whether the user can retry or correct the action without reopening the store.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Error::Open(_) | Error::Destroy(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upgrade_failure_is_fatal() {
        let err = Error::from(OpenError::Upgrade {
            from: 1,
            to: 2,
            reason: "disk full".to_string(),
        });
        assert!(!err.is_recoverable());
        assert_eq!(
            err.to_string(),
            "schema upgrade from v1 to v2 failed: disk full"
        );
    }

    #[test]
    fn test_duplicate_is_recoverable() {
        let key = PayslipKey::new("1", "primera-2024-03");
        let err = Error::Duplicate(key.clone());
        assert!(err.is_recoverable());
        assert_eq!(err.duplicate_key(), Some(&key));
        assert!(!Error::Destroy("busy".to_string()).is_recoverable());
    }
}

impl From<native_db::db_type::Error> for Error {
    fn from(err: native_db::db_type::Error) -> Self {
        Error::Database(err.to_string())
    }
}

/// Result type for database operations.
pub type Result<T> = std::result::Result<T, Error>;
