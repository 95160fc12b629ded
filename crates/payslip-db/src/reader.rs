//! Read access shared by read-only and read-write transactions.
//!
//! The duplicate check has to run inside the insert's write transaction, so
//! lookups are written once against this trait instead of per transaction type.

use crate::error::{Error, Result};
use crate::models::PayslipRow;
use native_db::db_type::{KeyOptions, ToKeyDefinition};
use native_db::transaction::{RTransaction, RwTransaction};

pub(crate) trait Reader {
    /// Every row of a model, in primary key order.
    fn all<T: PayslipRow>(&self) -> Result<Vec<T>>;

    /// Rows whose secondary key starts with `value`.
    ///
    /// Prefix matches are not exact; callers filter on the row fields.
    fn by_secondary<T: PayslipRow>(
        &self,
        key: impl ToKeyDefinition<KeyOptions>,
        value: &str,
    ) -> Result<Vec<T>>;

    /// One row by primary key.
    fn by_id<T: PayslipRow>(&self, id: u64) -> Result<Option<T>>;
}

impl Reader for RTransaction<'_> {
    fn all<T: PayslipRow>(&self) -> Result<Vec<T>> {
        let scan = self.scan().primary::<T>()?;
        let iter = scan.all()?;
        let rows: std::result::Result<Vec<T>, _> = iter.collect();
        rows.map_err(|e| Error::Database(e.to_string()))
    }

    fn by_secondary<T: PayslipRow>(
        &self,
        key: impl ToKeyDefinition<KeyOptions>,
        value: &str,
    ) -> Result<Vec<T>> {
        let scan = self.scan().secondary::<T>(key)?;
        let iter = scan.start_with(value)?;
        let rows: std::result::Result<Vec<T>, _> = iter.collect();
        rows.map_err(|e| Error::Database(e.to_string()))
    }

    fn by_id<T: PayslipRow>(&self, id: u64) -> Result<Option<T>> {
        Ok(self.get().primary(id)?)
    }
}

impl Reader for RwTransaction<'_> {
    fn all<T: PayslipRow>(&self) -> Result<Vec<T>> {
        let scan = self.scan().primary::<T>()?;
        let iter = scan.all()?;
        let rows: std::result::Result<Vec<T>, _> = iter.collect();
        rows.map_err(|e| Error::Database(e.to_string()))
    }

    fn by_secondary<T: PayslipRow>(
        &self,
        key: impl ToKeyDefinition<KeyOptions>,
        value: &str,
    ) -> Result<Vec<T>> {
        let scan = self.scan().secondary::<T>(key)?;
        let iter = scan.start_with(value)?;
        let rows: std::result::Result<Vec<T>, _> = iter.collect();
        rows.map_err(|e| Error::Database(e.to_string()))
    }

    fn by_id<T: PayslipRow>(&self, id: u64) -> Result<Option<T>> {
        Ok(self.get().primary(id)?)
    }
}
