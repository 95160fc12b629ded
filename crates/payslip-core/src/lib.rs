//! Payslip Core - Domain types for the payslip portal
//!
//! This crate holds everything the portal knows about a payslip without
//! touching storage:
//! - Record identity (`RecordId`, `PayslipKey`)
//! - Stored records and pending writes (`PayslipRecord`, `NewPayslip`)
//! - Pay periods (`Period`, `Half`) with key parsing and display labels
//! - The static employee directory
//! - Upload intake (`UploadedFile`) and download reconstruction (`DownloadArtifact`)
//! - The cosmetic administrative gate (`AdminGate`)

mod directory;
mod download;
mod error;
mod gate;
mod identity;
pub mod period;
mod record;
mod upload;

pub use directory::{Employee, EmployeeDirectory, PLACEHOLDER_NAME};
pub use download::{DownloadArtifact, SPREADSHEET_CONTENT_TYPE};
pub use error::{Error, Result};
pub use gate::AdminGate;
pub use identity::{PayslipKey, RecordId};
pub use period::{Half, Period, MAX_RECENT_MONTHS};
pub use record::{NewPayslip, PayslipRecord, Status};
pub use upload::{UploadedFile, ACCEPTED_EXTENSIONS};
