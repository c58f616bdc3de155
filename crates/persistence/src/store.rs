//! Workbook-backed record store.
//!
//! The whole ledger lives in one `.xlsx` file. Every save rewrites the file
//! from the in-memory sequence; there is no incremental append and no file
//! locking, so concurrent writers from different processes race and the last
//! one wins.

use calamine::{open_workbook, Reader, Xlsx};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::entities::maintenance_request::is_blank_row;
use crate::entities::{LedgerColumns, MaintenanceRequestEntity};
use crate::error::StoreError;
use crate::layout::write_ledger;
use crate::metrics::StoreTimer;
use domain::models::MaintenanceRequest;
use shared::dates::is_created_date;

/// Record store persisting the maintenance ledger as a workbook.
#[derive(Debug, Clone)]
pub struct WorkbookStore {
    path: PathBuf,
}

impl WorkbookStore {
    /// Creates a store for the workbook at `path`. The file need not exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the workbook path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every request in ledger order.
    ///
    /// A missing file is an empty ledger.
    pub fn load(&self) -> Result<Vec<MaintenanceRequest>, StoreError> {
        let timer = StoreTimer::new("load");
        let result = self.read_entities();
        timer.record();

        let entities = result?;
        debug!(path = %self.path.display(), records = entities.len(), "Ledger loaded");
        Ok(entities.into_iter().map(MaintenanceRequest::from).collect())
    }

    /// Replaces the ledger with `records` and reapplies sheet formatting.
    pub fn save(&self, records: &[MaintenanceRequest]) -> Result<(), StoreError> {
        let rows: Vec<MaintenanceRequestEntity> =
            records.iter().map(MaintenanceRequestEntity::from).collect();

        let timer = StoreTimer::new("save");
        let result = write_ledger(&self.path, &rows);
        timer.record();

        result?;
        debug!(path = %self.path.display(), records = rows.len(), "Ledger saved");
        Ok(())
    }

    fn read_entities(&self) -> Result<Vec<MaintenanceRequestEntity>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut workbook: Xlsx<_> = open_workbook(&self.path).map_err(|source| StoreError::Read {
            path: self.path.clone(),
            source,
        })?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| StoreError::NoWorksheet(self.path.clone()))?
            .map_err(|source| StoreError::Read {
                path: self.path.clone(),
                source,
            })?;

        let mut rows = range.rows();
        let Some(header) = rows.next() else {
            return Ok(Vec::new());
        };
        let columns = LedgerColumns::from_header(header)?;

        // Sheet rows are 1-based and the header occupies the first one.
        let first_row = range.start().map_or(0, |(row, _)| row as usize) + 2;

        let mut entities = Vec::new();
        for (offset, row) in rows.enumerate() {
            if is_blank_row(row) {
                continue;
            }
            let entity = columns.entity(row, first_row + offset)?;
            if !is_created_date(&entity.created_date) {
                warn!(
                    id = entity.id,
                    created_date = %entity.created_date,
                    "Ledger row has an unexpected date format"
                );
            }
            entities.push(entity);
        }
        Ok(entities)
    }
}
