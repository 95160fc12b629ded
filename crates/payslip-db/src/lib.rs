//! Payslip DB - Persistence layer using native_db
//!
//! Provides:
//! - [`Store`]: opens the database file at a [`SchemaVersion`], running
//!   additive migrations on upgrade
//! - [`Repository`]: typed operations over the payslip table
//! - [`DuplicateGuard`]: the `(national_id, period)` uniqueness policy
//!
//! ```rust,ignore
//! use payslip_db::{Repository, SchemaVersion, Store};
//!
//! let store = Store::open("payslips.db", SchemaVersion::CURRENT)?;
//! let repo = Repository::new(store);
//! let record = repo.insert_unique(new_payslip)?;
//! assert!(repo.exists_by_key(&record.national_id, &record.period)?);
//! ```

mod error;
mod guard;
mod models;
mod reader;
mod repository;
mod store;

pub use error::{Error, OpenError, Result};
pub use guard::DuplicateGuard;
pub use repository::Repository;
pub use store::{Index, IndexCapability, SchemaVersion, Store};
