//! Payslip portal
//!
//! Service layer between the user-facing front end and the store:
//! - [`Portal`]: upload, employee lookup, download and search flows
//! - [`AdminSession`]: inventory, export, delete and reset behind the admin gate
//! - [`Config`]: RON configuration
//! - [`logging`]: tracing subscriber setup for binaries

mod config;
mod error;
pub mod logging;
mod portal;

pub use config::{Config, ConfigError, CONFIG_ENV};
pub use error::{PortalError, Result};
pub use portal::{AdminSession, Lookup, Portal};
