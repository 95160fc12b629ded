//! Database models for persistent storage.

mod meta;
mod payslip;

pub use meta::*;
pub use payslip::*;
