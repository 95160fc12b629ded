//! Portal error type

use crate::config::ConfigError;
use thiserror::Error;

/// Errors surfaced to the front end
#[derive(Debug, Error)]
pub enum PortalError {
    #[error(transparent)]
    Store(#[from] payslip_db::Error),

    #[error(transparent)]
    Domain(#[from] payslip_core::Error),

    #[error(transparent)]
    Export(#[from] payslip_export::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Access denied: incorrect admin password")]
    AccessDenied,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PortalError {
    /// Whether the session must be restarted (store could not be opened).
    pub fn is_fatal(&self) -> bool {
        matches!(self, PortalError::Store(e) if !e.is_recoverable())
            || matches!(self, PortalError::Config(_))
    }
}

/// Result type for portal flows
pub type Result<T> = std::result::Result<T, PortalError>;
