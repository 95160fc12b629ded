//! Record repository: typed operations over the payslip table.
//!
//! Each public operation runs in a single transaction. Dispatch on the
//! store's schema version picks the row model; results are always plain
//! [`PayslipRecord`]s.

use crate::error::{Error, Result};
use crate::models::*;
use crate::reader::Reader;
use crate::store::{Index, IndexCapability, SchemaVersion, Store};
use native_db::transaction::RwTransaction;
use payslip_core::{NewPayslip, PayslipKey, PayslipRecord, RecordId};
use tracing::{debug, info, warn};

/// Payslip repository over an open [`Store`].
#[derive(Debug)]
pub struct Repository {
    store: Store,
}

impl Repository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Every payslip, in insertion order.
    pub fn list_all(&self) -> Result<Vec<PayslipRecord>> {
        let r = self.store.db.r_transaction()?;
        self.all_in(&r)
    }

    /// Number of stored payslips.
    pub fn count(&self) -> Result<u64> {
        let r = self.store.db.r_transaction()?;
        let count = match self.store.version() {
            SchemaVersion::V1 => r.len().primary::<StoredPayslipV1>()?,
            SchemaVersion::V2 => r.len().primary::<StoredPayslip>()?,
        };
        Ok(count)
    }

    /// Load one payslip by id.
    pub fn get(&self, id: RecordId) -> Result<PayslipRecord> {
        let r = self.store.db.r_transaction()?;
        let found = match self.store.version() {
            SchemaVersion::V1 => r.by_id::<StoredPayslipV1>(id.raw())?.map(PayslipRow::into_record),
            SchemaVersion::V2 => r.by_id::<StoredPayslip>(id.raw())?.map(PayslipRow::into_record),
        };
        found.ok_or(Error::NotFound(id))
    }

    /// All payslips for an employee. Empty when none match.
    pub fn find_by_national_id(&self, national_id: &str) -> Result<Vec<PayslipRecord>> {
        let r = self.store.db.r_transaction()?;
        let records = match self.store.version() {
            SchemaVersion::V1 => into_records(
                r.by_secondary::<StoredPayslipV1>(StoredPayslipV1Key::national_id, national_id)?,
            ),
            SchemaVersion::V2 => into_records(
                r.by_secondary::<StoredPayslip>(StoredPayslipKey::national_id, national_id)?,
            ),
        };
        debug!(national_id, found = records.len(), "payslips by national id");
        Ok(records
            .into_iter()
            .filter(|record| record.national_id == national_id)
            .collect())
    }

    /// All payslips for a period key. Empty when none match.
    pub fn find_by_period(&self, period: &str) -> Result<Vec<PayslipRecord>> {
        let r = self.store.db.r_transaction()?;
        let records = match self.store.version() {
            SchemaVersion::V1 => {
                into_records(r.by_secondary::<StoredPayslipV1>(StoredPayslipV1Key::period, period)?)
            }
            SchemaVersion::V2 => {
                into_records(r.by_secondary::<StoredPayslip>(StoredPayslipKey::period, period)?)
            }
        };
        Ok(records
            .into_iter()
            .filter(|record| record.period == period)
            .collect())
    }

    /// The payslip stored under a compound key, if any.
    pub fn find_by_key(&self, national_id: &str, period: &str) -> Result<Option<PayslipRecord>> {
        let r = self.store.db.r_transaction()?;
        self.find_by_key_in(&r, &PayslipKey::new(national_id, period))
    }

    /// Whether a payslip exists for `(national_id, period)`.
    ///
    /// Uses the compound index when the store has it, otherwise scans every
    /// row. The scan has no cost bound.
    pub fn exists_by_key(&self, national_id: &str, period: &str) -> Result<bool> {
        Ok(self.find_by_key(national_id, period)?.is_some())
    }

    /// Write a payslip without consulting the duplicate guard.
    ///
    /// Most callers want [`Repository::insert_unique`].
    pub fn insert(&self, new: NewPayslip) -> Result<PayslipRecord> {
        self.write(|rw| self.insert_in(rw, new))
    }

    /// Remove a payslip. `false` when the id does not exist.
    pub fn delete_by_id(&self, id: RecordId) -> Result<bool> {
        let removed = self.write(|rw| match self.store.version() {
            SchemaVersion::V1 => remove_row::<StoredPayslipV1>(rw, id.raw()),
            SchemaVersion::V2 => remove_row::<StoredPayslip>(rw, id.raw()),
        })?;
        if removed {
            info!(%id, "deleted payslip");
        } else {
            debug!(%id, "delete target absent");
        }
        Ok(removed)
    }

    /// Remove the payslip stored under a compound key. `false` when absent.
    pub fn delete_by_key(&self, national_id: &str, period: &str) -> Result<bool> {
        let found = self
            .find_by_national_id(national_id)?
            .into_iter()
            .find(|record| record.period == period);

        match found {
            Some(record) => self.delete_by_id(record.id),
            None => Ok(false),
        }
    }

    /// Give up the repository and hand back its store.
    pub fn into_store(self) -> Store {
        self.store
    }

    /// Remove every payslip. Irreversible; the id sequence is not reset.
    pub fn clear(&self) -> Result<()> {
        let removed = self.write(|rw| match self.store.version() {
            SchemaVersion::V1 => remove_all::<StoredPayslipV1>(rw),
            SchemaVersion::V2 => remove_all::<StoredPayslip>(rw),
        })?;
        info!(removed, "cleared payslip store");
        Ok(())
    }

    /// Run `op` in one write transaction. Nothing is committed if it fails.
    pub(crate) fn write<T>(
        &self,
        op: impl FnOnce(&RwTransaction<'_>) -> Result<T>,
    ) -> Result<T> {
        let rw = self.store.db.rw_transaction().map_err(Error::write)?;
        let value = op(&rw).map_err(Error::into_write)?;
        rw.commit().map_err(Error::write)?;
        Ok(value)
    }

    pub(crate) fn insert_in(
        &self,
        rw: &RwTransaction<'_>,
        new: NewPayslip,
    ) -> Result<PayslipRecord> {
        let id = next_id(rw)?;
        let record = match self.store.version() {
            SchemaVersion::V1 => insert_row::<StoredPayslipV1>(rw, id, new)?,
            SchemaVersion::V2 => insert_row::<StoredPayslip>(rw, id, new)?,
        };
        info!(
            %id,
            national_id = %record.national_id,
            period = %record.period,
            bytes = record.file_size_bytes,
            "stored payslip"
        );
        Ok(record)
    }

    pub(crate) fn find_by_key_in<R: Reader>(
        &self,
        tx: &R,
        key: &PayslipKey,
    ) -> Result<Option<PayslipRecord>> {
        match self.store.index_capability(Index::NationalIdPeriod) {
            IndexCapability::Available => {
                let rows = tx.by_secondary::<StoredPayslip>(
                    StoredPayslipKey::national_id_period,
                    &compound_key(&key.national_id, &key.period),
                )?;
                Ok(rows
                    .into_iter()
                    .find(|row| row.matches(key))
                    .map(PayslipRow::into_record))
            }
            IndexCapability::Unavailable => {
                warn!(
                    index = Index::NationalIdPeriod.name(),
                    "index unavailable, scanning all payslips"
                );
                Ok(self
                    .all_in(tx)?
                    .into_iter()
                    .find(|record| key.matches(&record.national_id, &record.period)))
            }
        }
    }

    fn all_in<R: Reader>(&self, tx: &R) -> Result<Vec<PayslipRecord>> {
        let records = match self.store.version() {
            SchemaVersion::V1 => into_records(tx.all::<StoredPayslipV1>()?),
            SchemaVersion::V2 => into_records(tx.all::<StoredPayslip>()?),
        };
        Ok(records)
    }
}

fn into_records<T: PayslipRow>(rows: Vec<T>) -> Vec<PayslipRecord> {
    rows.into_iter().map(PayslipRow::into_record).collect()
}

/// Advance the persisted key generator.
fn next_id(rw: &RwTransaction<'_>) -> Result<RecordId> {
    let current: Option<StoredSequence> = rw.get().primary(PAYSLIP_SEQUENCE.to_string())?;
    let last = current.map_or(0, |s| s.last) + 1;
    rw.upsert(StoredSequence {
        name: PAYSLIP_SEQUENCE.to_string(),
        last,
    })?;
    Ok(RecordId::new(last))
}

fn insert_row<T: PayslipRow>(
    rw: &RwTransaction<'_>,
    id: RecordId,
    new: NewPayslip,
) -> Result<PayslipRecord> {
    let record = new.into_record(id);
    rw.insert(T::from_record(record.clone()))?;
    Ok(record)
}

fn remove_row<T: PayslipRow>(rw: &RwTransaction<'_>, id: u64) -> Result<bool> {
    match rw.by_id::<T>(id)? {
        Some(row) => {
            rw.remove(row)?;
            Ok(true)
        }
        None => Ok(false),
    }
}

fn remove_all<T: PayslipRow>(rw: &RwTransaction<'_>) -> Result<usize> {
    let rows = rw.all::<T>()?;
    let removed = rows.len();
    for row in rows {
        rw.remove(row)?;
    }
    Ok(removed)
}
