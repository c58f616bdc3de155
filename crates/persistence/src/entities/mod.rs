//! Ledger entity definitions.
//!
//! Entities are direct mappings to workbook rows.

pub mod maintenance_request;

pub use maintenance_request::{LedgerColumn, LedgerColumns, MaintenanceRequestEntity};
