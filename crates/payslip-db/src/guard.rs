//! Duplicate guard: one payslip per `(national_id, period)`.
//!
//! The store's indexes are non-unique, so uniqueness is enforced here.
//! [`Repository::insert_unique`] runs the check and the insert in the same
//! write transaction, so two inserts for one key cannot both pass.

use crate::error::{Error, Result};
use crate::repository::Repository;
use payslip_core::{NewPayslip, PayslipKey, PayslipRecord};
use tracing::warn;

/// Uniqueness policy for payslip keys.
pub struct DuplicateGuard;

impl DuplicateGuard {
    /// Check a key against the repository without writing.
    ///
    /// Useful to reject an upload before reading the file. The result can
    /// be stale by the time a later insert runs; use
    /// [`Repository::insert_unique`] for the write itself.
    pub fn check(repo: &Repository, key: &PayslipKey) -> Result<()> {
        let taken = repo.exists_by_key(&key.national_id, &key.period)?;
        Self::ensure_vacant(key, taken)
    }

    /// Reject the write when the key is already taken.
    pub(crate) fn ensure_vacant(key: &PayslipKey, taken: bool) -> Result<()> {
        if taken {
            warn!(%key, "rejected duplicate payslip");
            Err(Error::Duplicate(key.clone()))
        } else {
            Ok(())
        }
    }
}

impl Repository {
    /// Insert a payslip unless its key is already taken.
    ///
    /// Fails with [`Error::Duplicate`] carrying the conflicting key; the table
    /// is left unchanged.
    pub fn insert_unique(&self, new: NewPayslip) -> Result<PayslipRecord> {
        let key = new.key();
        self.write(|rw| {
            let existing = self.find_by_key_in(rw, &key)?;
            DuplicateGuard::ensure_vacant(&key, existing.is_some())?;
            self.insert_in(rw, new)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{SchemaVersion, Store};
    use payslip_core::Status;

    fn payslip(national_id: &str, period: &str) -> NewPayslip {
        NewPayslip {
            national_id: national_id.to_string(),
            period: period.to_string(),
            period_label: String::new(),
            employee_name: "Empleado".to_string(),
            uploaded_at: "01/01/2024".to_string(),
            file_name: "a.xlsx".to_string(),
            file_size_bytes: 1,
            file_content: vec![1],
            status: Status::Processed,
        }
    }

    #[test]
    fn test_second_insert_is_rejected_without_mutation() {
        for version in [SchemaVersion::V1, SchemaVersion::V2] {
            let repo = Repository::new(Store::in_memory(version).unwrap());
            repo.insert_unique(payslip("1234567890", "primera-2024-03"))
                .unwrap();
            let before = repo.list_all().unwrap();

            let err = repo
                .insert_unique(payslip("1234567890", "primera-2024-03"))
                .unwrap_err();
            assert_eq!(
                err.duplicate_key(),
                Some(&PayslipKey::new("1234567890", "primera-2024-03"))
            );
            assert!(err.is_recoverable());
            assert_eq!(repo.list_all().unwrap(), before);
        }
    }

    #[test]
    fn test_rejected_insert_does_not_consume_an_id() {
        let repo = Repository::new(Store::in_memory(SchemaVersion::CURRENT).unwrap());
        repo.insert_unique(payslip("1", "p")).unwrap();
        assert!(repo.insert_unique(payslip("1", "p")).is_err());

        let next = repo.insert_unique(payslip("2", "p")).unwrap();
        assert_eq!(next.id.raw(), 2);
    }

    #[test]
    fn test_check_without_writing() {
        let repo = Repository::new(Store::in_memory(SchemaVersion::CURRENT).unwrap());
        let key = PayslipKey::new("1", "p");

        assert!(DuplicateGuard::check(&repo, &key).is_ok());
        repo.insert(payslip("1", "p")).unwrap();
        assert!(matches!(
            DuplicateGuard::check(&repo, &key),
            Err(Error::Duplicate(k)) if k == key
        ));
    }
}
