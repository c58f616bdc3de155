//! Record store errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading or writing the ledger workbook.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read ledger {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: calamine::XlsxError,
    },

    #[error("Ledger {} has no worksheet", .0.display())]
    NoWorksheet(PathBuf),

    #[error("Ledger is missing column '{0}'")]
    MissingColumn(&'static str),

    #[error("Invalid value in row {row}, column '{column}': {value}")]
    InvalidRow {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("Failed to write ledger: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
