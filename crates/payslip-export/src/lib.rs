//! Payslip Export - Descriptive exports of stored payslip metadata
//!
//! - **Exporter**: JSON array or CSV table of record metadata
//! - **Inventory**: totals shown on the admin overview
//!
//! Exports never include file content and are not read back by the portal.
//!
//! # Example
//!
//! ```rust,ignore
//! use payslip_export::{ExportFormat, Exporter};
//!
//! let records = repo.list_all()?;
//! let exporter = Exporter::new(&records);
//! let csv = exporter.export(ExportFormat::Csv)?;
//! println!("{}", exporter.inventory());
//! ```

mod error;
mod exporter;
mod inventory;

pub use error::{Error, Result};
pub use exporter::{ExportFormat, ExportRow, Exporter, CSV_HEADER};
pub use inventory::Inventory;
