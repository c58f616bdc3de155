//! Persistence layer for the maintenance intake backend.
//!
//! This crate contains:
//! - Ledger row mappings (column layout of the workbook)
//! - The workbook-backed record store
//! - Sheet formatting reapplied on every save

pub mod entities;
pub mod error;
pub mod layout;
pub mod metrics;
pub mod store;

pub use error::StoreError;
pub use store::WorkbookStore;
