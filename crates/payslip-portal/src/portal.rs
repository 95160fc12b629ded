//! Portal flows
//!
//! Each flow is one call into the repository. Messages shown to the user are
//! the caller's concern; flows only return data or errors.

use crate::config::Config;
use crate::error::{PortalError, Result};
use chrono::NaiveDate;
use payslip_core::{
    AdminGate, DownloadArtifact, EmployeeDirectory, NewPayslip, PayslipRecord, Period, RecordId,
    UploadedFile,
};
use payslip_db::{Repository, Store};
use payslip_export::{ExportFormat, Exporter, Inventory};
use std::path::{Path, PathBuf};
use tracing::info;

/// Outcome of an employee looking up one payslip
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    /// The payslip for the requested period
    Found(PayslipRecord),
    /// The employee has payslips, but not for this period
    PeriodMissing { available: Vec<String> },
    /// Nothing stored for this national id
    NoRecords,
}

/// Portal service over an explicitly constructed repository
pub struct Portal {
    repo: Repository,
    directory: EmployeeDirectory,
    gate: AdminGate,
}

impl Portal {
    pub fn new(repo: Repository, directory: EmployeeDirectory, gate: AdminGate) -> Self {
        Self {
            repo,
            directory,
            gate,
        }
    }

    /// Open the configured store and build a portal over it
    pub fn open(config: &Config) -> Result<Self> {
        let version = config.schema_version()?;
        let store = Store::open(&config.database_path, version)?;
        info!(path = %config.database_path.display(), %version, "payslip store ready");
        Ok(Self::new(
            Repository::new(store),
            config.directory(),
            AdminGate::new(config.admin_secret.clone()),
        ))
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    pub fn directory(&self) -> &EmployeeDirectory {
        &self.directory
    }

    /// Store an uploaded payslip.
    ///
    /// The period is normalized to its canonical key. A second upload for
    /// the same employee and period is rejected with a duplicate error and
    /// nothing is written.
    pub fn upload(
        &self,
        national_id: &str,
        period: &str,
        file: UploadedFile,
        today: NaiveDate,
    ) -> Result<PayslipRecord> {
        let period = Period::parse(period)?;
        let new = NewPayslip::from_upload(national_id, &period, file, &self.directory, today)?;
        Ok(self.repo.insert_unique(new)?)
    }

    /// Find an employee's payslip for one period
    pub fn lookup(&self, national_id: &str, period: &str) -> Result<Lookup> {
        let national_id = national_id.trim();
        if national_id.is_empty() {
            return Err(payslip_core::Error::MissingField("national_id").into());
        }
        if period.trim().is_empty() {
            return Err(payslip_core::Error::MissingField("period").into());
        }
        let period = normalize_period(period);

        let records = self.repo.find_by_national_id(national_id)?;
        if records.is_empty() {
            return Ok(Lookup::NoRecords);
        }

        let mut available = Vec::with_capacity(records.len());
        for record in records {
            if record.period == period {
                return Ok(Lookup::Found(record));
            }
            available.push(record.period_label);
        }
        Ok(Lookup::PeriodMissing { available })
    }

    /// Every payslip stored for an employee
    pub fn search(&self, national_id: &str) -> Result<Vec<PayslipRecord>> {
        Ok(self.repo.find_by_national_id(national_id.trim())?)
    }

    /// Rebuild the original upload for a stored payslip
    pub fn download(&self, id: RecordId) -> Result<DownloadArtifact> {
        let record = self.repo.get(id)?;
        Ok(DownloadArtifact::from_record(&record))
    }

    /// Unlock admin-only actions
    pub fn admin(&self, secret: &str) -> Result<AdminSession<'_>> {
        if self.gate.check(secret) {
            Ok(AdminSession { portal: self })
        } else {
            Err(PortalError::AccessDenied)
        }
    }

    /// Close the store and delete its file (admin).
    ///
    /// Consumes the portal; a later [`Portal::open`] creates a fresh store
    /// whose ids start again at 1.
    pub fn destroy(self, secret: &str) -> Result<()> {
        if !self.gate.check(secret) {
            return Err(PortalError::AccessDenied);
        }
        self.repo.into_store().destroy()?;
        Ok(())
    }
}

/// Admin-only actions, available after passing the gate
pub struct AdminSession<'a> {
    portal: &'a Portal,
}

impl AdminSession<'_> {
    pub fn records(&self) -> Result<Vec<PayslipRecord>> {
        Ok(self.portal.repo.list_all()?)
    }

    pub fn inventory(&self) -> Result<Inventory> {
        let records = self.records()?;
        Ok(Exporter::new(&records).inventory())
    }

    /// Render an export without writing it
    pub fn export(&self, format: ExportFormat) -> Result<String> {
        let records = self.records()?;
        Ok(Exporter::new(&records).export(format)?)
    }

    /// Write an export file into `dir`
    pub fn export_to_dir(
        &self,
        format: ExportFormat,
        dir: impl AsRef<Path>,
        today: NaiveDate,
    ) -> Result<PathBuf> {
        let records = self.records()?;
        let path = Exporter::new(&records).write_to_dir(dir, format, today)?;
        info!(path = %path.display(), records = records.len(), "exported payslips");
        Ok(path)
    }

    pub fn delete(&self, id: RecordId) -> Result<bool> {
        Ok(self.portal.repo.delete_by_id(id)?)
    }

    pub fn delete_by_key(&self, national_id: &str, period: &str) -> Result<bool> {
        Ok(self
            .portal
            .repo
            .delete_by_key(national_id.trim(), &normalize_period(period))?)
    }

    /// Remove every stored payslip
    pub fn reset(&self) -> Result<()> {
        Ok(self.portal.repo.clear()?)
    }
}

// Unparseable keys are looked up verbatim.
fn normalize_period(period: &str) -> String {
    Period::parse(period)
        .map(|p| p.key())
        .unwrap_or_else(|_| period.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use payslip_db::SchemaVersion;

    fn portal() -> Portal {
        let store = Store::in_memory(SchemaVersion::CURRENT).unwrap();
        Portal::new(
            Repository::new(store),
            EmployeeDirectory::default(),
            AdminGate::new("secret"),
        )
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 18).unwrap()
    }

    fn file(bytes: &[u8]) -> UploadedFile {
        UploadedFile::new("marzo.xlsx", bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_upload_and_download_round_trip() {
        let portal = portal();
        let record = portal
            .upload("1234567890", "primera-2024-03", file(b"PK\x03\x04data"), today())
            .unwrap();

        assert_eq!(record.employee_name, "Juan Pérez");
        assert_eq!(record.period_label, "Primera Quincena Marzo 2024");
        assert_eq!(record.uploaded_at, "18/03/2024");

        let artifact = portal.download(record.id).unwrap();
        assert_eq!(artifact.bytes, b"PK\x03\x04data".to_vec());
        assert_eq!(artifact.file_name, "marzo.xlsx");
    }

    #[test]
    fn test_upload_normalizes_legacy_period() {
        let portal = portal();
        let record = portal
            .upload("1", "primera_quincena_3_2024", file(b"x"), today())
            .unwrap();
        assert_eq!(record.period, "primera-2024-03");

        // Same period in the canonical shape is a duplicate.
        let err = portal
            .upload("1", "primera-2024-03", file(b"y"), today())
            .unwrap_err();
        assert!(matches!(
            err,
            PortalError::Store(payslip_db::Error::Duplicate(_))
        ));
        assert_eq!(portal.repository().count().unwrap(), 1);
    }

    #[test]
    fn test_upload_rejects_bad_period() {
        let portal = portal();
        let err = portal.upload("1", "otra-clave", file(b"x"), today()).unwrap_err();
        assert!(matches!(
            err,
            PortalError::Domain(payslip_core::Error::InvalidPeriod(_))
        ));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_lookup_outcomes() {
        let portal = portal();
        portal
            .upload("1234567890", "primera-2024-03", file(b"a"), today())
            .unwrap();
        portal
            .upload("1234567890", "segunda-2024-03", file(b"b"), today())
            .unwrap();

        match portal.lookup(" 1234567890 ", "segunda-2024-03").unwrap() {
            Lookup::Found(record) => assert_eq!(record.file_content, b"b".to_vec()),
            other => panic!("unexpected {:?}", other),
        }

        assert_eq!(
            portal.lookup("1234567890", "primera-2024-04").unwrap(),
            Lookup::PeriodMissing {
                available: vec![
                    "Primera Quincena Marzo 2024".to_string(),
                    "Segunda Quincena Marzo 2024".to_string(),
                ]
            }
        );
        assert_eq!(portal.lookup("555", "primera-2024-03").unwrap(), Lookup::NoRecords);
        assert!(portal.lookup("  ", "primera-2024-03").is_err());
    }

    #[test]
    fn test_lookup_requires_period() {
        let portal = portal();
        portal
            .upload("1234567890", "primera-2024-03", file(b"a"), today())
            .unwrap();

        let err = portal.lookup("1234567890", " ").unwrap_err();
        assert!(matches!(
            err,
            PortalError::Domain(payslip_core::Error::MissingField("period"))
        ));
    }

    #[test]
    fn test_admin_gate() {
        let portal = portal();
        assert!(matches!(portal.admin("wrong"), Err(PortalError::AccessDenied)));
        assert!(portal.admin("secret").is_ok());
    }

    #[test]
    fn test_admin_actions() {
        let portal = portal();
        let a = portal
            .upload("1234567890", "primera-2024-03", file(&[0; 1024]), today())
            .unwrap();
        portal
            .upload("9876543210", "primera-2024-03", file(&[0; 1024]), today())
            .unwrap();

        let admin = portal.admin("secret").unwrap();
        let inventory = admin.inventory().unwrap();
        assert_eq!(inventory.total_records, 2);
        assert_eq!(inventory.employees, 2);
        assert_eq!(inventory.total_kb, 2.0);

        let csv = admin.export(ExportFormat::Csv).unwrap();
        assert_eq!(csv.lines().count(), 3);

        let dir = tempfile::tempdir().expect("tempdir");
        let path = admin
            .export_to_dir(ExportFormat::Json, dir.path(), today())
            .unwrap();
        assert!(path.ends_with("payslips_2024-03-18.json"));

        assert!(admin.delete(a.id).unwrap());
        assert!(!admin.delete(a.id).unwrap());
        assert!(admin.delete_by_key("9876543210", "primera_quincena_3_2024").unwrap());

        portal.upload("1", "primera-2024-03", file(b"z"), today()).unwrap();
        admin.reset().unwrap();
        assert!(admin.records().unwrap().is_empty());
    }

    #[test]
    fn test_open_from_config() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = Config {
            database_path: dir.path().join("p.db"),
            ..Config::default()
        };

        let portal = Portal::open(&config).unwrap();
        assert_eq!(portal.repository().store().version(), SchemaVersion::CURRENT);
        assert_eq!(portal.directory().len(), 2);
    }

    #[test]
    fn test_destroy_restarts_ids() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = Config {
            database_path: dir.path().join("p.db"),
            admin_secret: "secret".to_string(),
            ..Config::default()
        };

        let portal = Portal::open(&config).unwrap();
        portal.upload("1", "primera-2024-03", file(b"a"), today()).unwrap();
        let second = portal.upload("1", "segunda-2024-03", file(b"b"), today()).unwrap();
        assert_eq!(second.id, RecordId::new(2));

        portal.destroy("secret").unwrap();
        assert!(!config.database_path.exists());

        let portal = Portal::open(&config).unwrap();
        assert_eq!(portal.repository().count().unwrap(), 0);
        let first = portal.upload("1", "primera-2024-03", file(b"c"), today()).unwrap();
        assert_eq!(first.id, RecordId::new(1));
    }

    #[test]
    fn test_destroy_requires_secret() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = Config {
            database_path: dir.path().join("p.db"),
            admin_secret: "secret".to_string(),
            ..Config::default()
        };

        let portal = Portal::open(&config).unwrap();
        assert!(matches!(portal.destroy("wrong"), Err(PortalError::AccessDenied)));
        assert!(config.database_path.exists());
    }
}
