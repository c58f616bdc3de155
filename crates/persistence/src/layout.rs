//! Sheet layout reapplied on every save.
//!
//! The whole sheet is regenerated each time: named table, column widths and
//! status colours are recomputed from scratch for every row.

use rust_xlsxwriter::{Color, Format, Table, TableColumn, TableStyle, Workbook, Worksheet};
use std::path::Path;

use crate::entities::{LedgerColumn, MaintenanceRequestEntity};
use crate::error::StoreError;
use domain::models::RequestStatus;

/// Name of the sheet and of the table spanning it.
pub const TABLE_NAME: &str = "Solicitacoes";

/// Characters added to the longest value of each column.
pub const COLUMN_PADDING: usize = 5;

/// Fill for completed requests.
pub const COMPLETED_FILL: u32 = 0xC6EFCE;

/// Fill for open requests.
pub const OPEN_FILL: u32 = 0xFFC7CE;

/// Background colour of a row, keyed on its status label.
pub fn status_fill(status: &str) -> Option<u32> {
    match RequestStatus::from_label(status) {
        RequestStatus::Completed => Some(COMPLETED_FILL),
        RequestStatus::Open => Some(OPEN_FILL),
        RequestStatus::Other(_) => None,
    }
}

/// Width of every column: longest value (header included) plus padding.
pub fn column_widths(rows: &[MaintenanceRequestEntity]) -> [usize; 7] {
    let mut widths = [0usize; 7];
    for column in LedgerColumn::ALL {
        let longest = rows
            .iter()
            .map(|row| row.text(column).chars().count())
            .chain(std::iter::once(column.header().chars().count()))
            .max()
            .unwrap_or(0);
        widths[column.index()] = longest + COLUMN_PADDING;
    }
    widths
}

fn ledger_table() -> Table {
    let columns: Vec<TableColumn> = LedgerColumn::ALL
        .iter()
        .map(|column| TableColumn::new().set_header(column.header()))
        .collect();

    Table::new()
        .set_name(TABLE_NAME)
        .set_style(TableStyle::Medium9)
        .set_first_column(false)
        .set_last_column(false)
        .set_banded_rows(true)
        .set_banded_columns(false)
        .set_columns(&columns)
}

fn write_row(
    worksheet: &mut Worksheet,
    row: u32,
    entity: &MaintenanceRequestEntity,
) -> Result<(), StoreError> {
    let format = match status_fill(&entity.status) {
        Some(rgb) => Format::new().set_background_color(Color::RGB(rgb)),
        None => Format::new(),
    };

    for column in LedgerColumn::ALL {
        let col = column.index() as u16;
        match column {
            LedgerColumn::Id => {
                worksheet.write_number_with_format(row, col, entity.id as f64, &format)?;
            }
            _ => {
                worksheet.write_string_with_format(row, col, entity.text(column), &format)?;
            }
        }
    }
    Ok(())
}

/// Writes the full ledger to `path`, replacing whatever was there.
pub fn write_ledger(path: &Path, rows: &[MaintenanceRequestEntity]) -> Result<(), StoreError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(TABLE_NAME)?;

    for column in LedgerColumn::ALL {
        worksheet.write_string(0, column.index() as u16, column.header())?;
    }

    for (offset, entity) in rows.iter().enumerate() {
        write_row(worksheet, offset as u32 + 1, entity)?;
    }

    for (index, width) in column_widths(rows).into_iter().enumerate() {
        worksheet.set_column_width(index as u16, width as f64)?;
    }

    // Tables need at least one data row; an empty ledger is header only.
    if !rows.is_empty() {
        let last_col = (LedgerColumn::ALL.len() - 1) as u16;
        worksheet.add_table(0, 0, rows.len() as u32, last_col, &ledger_table())?;
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    workbook.save(path)?;
    Ok(())
}
