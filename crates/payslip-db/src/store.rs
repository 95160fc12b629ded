//! Database store wrapper and schema management.

use crate::error::{Error, OpenError, Result};
use crate::models::*;
use native_db::*;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, info};

// Model set for stores opened at schema v1
static V1_MODELS: LazyLock<Models> = LazyLock::new(|| {
    let mut models = Models::new();
    models.define::<StoredPayslipV1>().unwrap();
    models.define::<StoredSchemaMeta>().unwrap();
    models.define::<StoredSequence>().unwrap();
    models
});

// Model set for stores opened at schema v2; keeps v1 so it can be migrated
static V2_MODELS: LazyLock<Models> = LazyLock::new(|| {
    let mut models = Models::new();
    models.define::<StoredPayslipV1>().unwrap();
    models.define::<StoredPayslip>().unwrap();
    models.define::<StoredSchemaMeta>().unwrap();
    models.define::<StoredSequence>().unwrap();
    models
});

/// Schema version a store is opened at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SchemaVersion {
    /// Record table with the `national_id` and `period` indexes.
    V1 = 1,
    /// Adds the compound `national_id_period` index.
    V2 = 2,
}

impl SchemaVersion {
    pub const CURRENT: SchemaVersion = SchemaVersion::V2;

    pub fn number(self) -> u32 {
        self as u32
    }

    pub fn from_number(n: u32) -> Option<Self> {
        match n {
            1 => Some(SchemaVersion::V1),
            2 => Some(SchemaVersion::V2),
            _ => None,
        }
    }

    /// Indexes that exist at this version.
    pub fn indexes(self) -> &'static [Index] {
        match self {
            SchemaVersion::V1 => &[Index::NationalId, Index::Period],
            SchemaVersion::V2 => &[Index::NationalId, Index::Period, Index::NationalIdPeriod],
        }
    }

    fn models(self) -> &'static Models {
        match self {
            SchemaVersion::V1 => &*V1_MODELS,
            SchemaVersion::V2 => &*V2_MODELS,
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.number())
    }
}

/// Secondary indexes on the payslip table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Index {
    NationalId,
    Period,
    NationalIdPeriod,
}

impl Index {
    pub fn name(self) -> &'static str {
        match self {
            Index::NationalId => "national_id",
            Index::Period => "period",
            Index::NationalIdPeriod => "national_id_period",
        }
    }
}

/// Whether an index can serve lookups on an open store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexCapability {
    Available,
    Unavailable,
}

/// Database store for payslips.
pub struct Store {
    pub(crate) db: Database<'static>,
    version: SchemaVersion,
    /// Backing file; `None` for in-memory stores.
    path: Option<PathBuf>,
}

impl Store {
    /// Open or create a database at the given path, upgrading it to `version`.
    pub fn open(path: impl AsRef<Path>, version: SchemaVersion) -> Result<Self> {
        let path = path.as_ref();
        let db = Builder::new()
            .create(version.models(), path)
            .map_err(|e| OpenError::Unavailable(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), %version, "opened payslip store");
        Self::init(db, version, Some(path.to_path_buf()))
    }

    /// Create an in-memory database.
    pub fn in_memory(version: SchemaVersion) -> Result<Self> {
        let db = Builder::new()
            .create_in_memory(version.models())
            .map_err(|e| OpenError::Unavailable(e.to_string()))?;
        Self::init(db, version, None)
    }

    fn init(db: Database<'static>, version: SchemaVersion, path: Option<PathBuf>) -> Result<Self> {
        let store = Self { db, version, path };
        store.upgrade()?;
        Ok(store)
    }

    /// Close the handle and delete the database file.
    ///
    /// Unlike [`Repository::clear`](crate::Repository::clear) this also drops
    /// the schema and the id sequence; the next open starts from scratch.
    pub fn destroy(self) -> Result<()> {
        let Store { db, path, .. } = self;
        drop(db);

        if let Some(path) = path {
            fs::remove_file(&path)
                .map_err(|e| Error::Destroy(format!("{}: {}", path.display(), e)))?;
            info!(path = %path.display(), "deleted payslip store");
        }
        Ok(())
    }

    /// Schema version this handle was opened at.
    pub fn version(&self) -> SchemaVersion {
        self.version
    }

    /// Schema version recorded in the file, if any.
    pub fn stored_version(&self) -> Result<Option<u32>> {
        let r = self.db.r_transaction()?;
        let meta: Option<StoredSchemaMeta> = r.get().primary(SCHEMA_ROW.to_string())?;
        Ok(meta.map(|m| m.version))
    }

    /// Check whether an index can be used on this handle.
    pub fn index_capability(&self, index: Index) -> IndexCapability {
        if self.version.indexes().contains(&index) {
            IndexCapability::Available
        } else {
            IndexCapability::Unavailable
        }
    }

    /// Bring the file up to this handle's version.
    ///
    /// Migrations only add indexes; rows are copied forward unchanged.
    fn upgrade(&self) -> Result<()> {
        let requested = self.version.number();
        let stored = self
            .stored_version()
            .map_err(|e| OpenError::Unavailable(e.to_string()))?;

        let from = match stored {
            Some(stored) if stored > requested => {
                return Err(OpenError::Downgrade { stored, requested }.into());
            }
            Some(stored) if stored == requested => return Ok(()),
            Some(stored) => stored,
            None => 0,
        };

        info!(from, to = requested, "upgrading payslip store schema");
        self.migrate(from).map_err(|e| {
            Error::from(OpenError::Upgrade {
                from,
                to: requested,
                reason: e.to_string(),
            })
        })
    }

    fn migrate(&self, from: u32) -> Result<()> {
        let rw = self.db.rw_transaction()?;
        if from == SchemaVersion::V1.number() && self.version >= SchemaVersion::V2 {
            rw.migrate::<StoredPayslip>()?;
            info!("rebuilt payslip indexes for {}", SchemaVersion::V2);
        }
        rw.upsert(StoredSchemaMeta::new(self.version.number()))?;
        rw.commit()?;
        Ok(())
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("version", &self.version)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_fresh_store_records_version() {
        let store = Store::in_memory(SchemaVersion::CURRENT).unwrap();
        assert_eq!(store.version(), SchemaVersion::V2);
        assert_eq!(store.stored_version().unwrap(), Some(2));
    }

    #[test]
    fn test_index_capability_by_version() {
        let v1 = Store::in_memory(SchemaVersion::V1).unwrap();
        assert_eq!(v1.index_capability(Index::NationalId), IndexCapability::Available);
        assert_eq!(
            v1.index_capability(Index::NationalIdPeriod),
            IndexCapability::Unavailable
        );

        let v2 = Store::in_memory(SchemaVersion::V2).unwrap();
        assert_eq!(
            v2.index_capability(Index::NationalIdPeriod),
            IndexCapability::Available
        );
    }

    #[test]
    fn test_reopen_is_idempotent() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("payslips.db");

        drop(Store::open(&path, SchemaVersion::V2).unwrap());
        let store = Store::open(&path, SchemaVersion::V2).unwrap();
        assert_eq!(store.stored_version().unwrap(), Some(2));
    }

    #[test]
    fn test_upgrade_v1_to_v2() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("payslips.db");

        let v1 = Store::open(&path, SchemaVersion::V1).unwrap();
        assert_eq!(v1.stored_version().unwrap(), Some(1));
        drop(v1);

        let v2 = Store::open(&path, SchemaVersion::V2).unwrap();
        assert_eq!(v2.stored_version().unwrap(), Some(2));
    }

    #[test]
    fn test_downgrade_is_refused() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("payslips.db");

        drop(Store::open(&path, SchemaVersion::V2).unwrap());
        let err = Store::open(&path, SchemaVersion::V1).unwrap_err();
        assert!(matches!(
            err,
            Error::Open(OpenError::Downgrade {
                stored: 2,
                requested: 1
            })
        ));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_destroy_removes_file() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("payslips.db");

        let store = Store::open(&path, SchemaVersion::CURRENT).unwrap();
        assert!(path.exists());
        store.destroy().unwrap();
        assert!(!path.exists());

        let store = Store::open(&path, SchemaVersion::CURRENT).unwrap();
        assert_eq!(store.stored_version().unwrap(), Some(2));
    }

    #[test]
    fn test_destroy_in_memory() {
        let store = Store::in_memory(SchemaVersion::CURRENT).unwrap();
        store.destroy().unwrap();
    }

    #[test]
    fn test_unavailable_path() {
        let dir = tempdir().expect("tempdir");

        // A directory cannot be opened as a database file.
        let err = Store::open(dir.path(), SchemaVersion::CURRENT).unwrap_err();
        assert!(matches!(err, Error::Open(OpenError::Unavailable(_))));
    }
}
