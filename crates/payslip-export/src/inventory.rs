//! Admin overview totals

use payslip_core::PayslipRecord;
use std::collections::HashSet;
use std::fmt;

/// Totals across every stored payslip
#[derive(Debug, Clone, PartialEq)]
pub struct Inventory {
    pub total_records: usize,
    /// Distinct national ids
    pub employees: usize,
    pub total_kb: f64,
}

impl Inventory {
    pub fn from_records(records: &[PayslipRecord]) -> Self {
        let employees: HashSet<&str> = records.iter().map(|r| r.national_id.as_str()).collect();
        let total_bytes: u64 = records.iter().map(|r| r.file_size_bytes).sum();

        Self {
            total_records: records.len(),
            employees: employees.len(),
            total_kb: total_bytes as f64 / 1024.0,
        }
    }
}

impl fmt::Display for Inventory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Payslips:  {}", self.total_records)?;
        writeln!(f, "Employees: {}", self.employees)?;
        write!(f, "Total:     {:.2} KB", self.total_kb)
    }
}
