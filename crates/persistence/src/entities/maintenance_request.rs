//! Maintenance request entity (workbook row mapping).

use calamine::Data;
use domain::models::{MaintenanceRequest, RequestStatus};

use crate::error::StoreError;

/// Columns of the ledger sheet, in the order they are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerColumn {
    Id,
    RequesterName,
    RequesterEmail,
    Equipment,
    Description,
    CreatedDate,
    Status,
}

impl LedgerColumn {
    pub const ALL: [LedgerColumn; 7] = [
        LedgerColumn::Id,
        LedgerColumn::RequesterName,
        LedgerColumn::RequesterEmail,
        LedgerColumn::Equipment,
        LedgerColumn::Description,
        LedgerColumn::CreatedDate,
        LedgerColumn::Status,
    ];

    /// Header cell text.
    pub fn header(self) -> &'static str {
        match self {
            LedgerColumn::Id => "ID",
            LedgerColumn::RequesterName => "Solicitante",
            LedgerColumn::RequesterEmail => "E-mail",
            LedgerColumn::Equipment => "Equipamento",
            LedgerColumn::Description => "Descrição",
            LedgerColumn::CreatedDate => "Data",
            LedgerColumn::Status => "Status",
        }
    }

    /// Zero-based position when writing.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Where each column sits in a sheet being read.
///
/// Hand-edited ledgers may have reordered columns, so positions come from
/// the header row rather than from [`LedgerColumn::index`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerColumns {
    positions: [usize; 7],
}

impl LedgerColumns {
    /// Locates every canonical column in a header row.
    pub fn from_header(header: &[Data]) -> Result<Self, StoreError> {
        let mut positions = [0usize; 7];
        for column in LedgerColumn::ALL {
            positions[column.index()] = header
                .iter()
                .position(|cell| cell_text(cell).trim() == column.header())
                .ok_or(StoreError::MissingColumn(column.header()))?;
        }
        Ok(Self { positions })
    }

    fn cell<'a>(&self, row: &'a [Data], column: LedgerColumn) -> Option<&'a Data> {
        row.get(self.positions[column.index()])
    }

    fn text(&self, row: &[Data], column: LedgerColumn) -> String {
        self.cell(row, column).map(cell_text).unwrap_or_default()
    }

    /// Maps one data row. `row_number` is 1-based as shown in a spreadsheet.
    pub fn entity(
        &self,
        row: &[Data],
        row_number: usize,
    ) -> Result<MaintenanceRequestEntity, StoreError> {
        let id_cell = self.cell(row, LedgerColumn::Id);
        let id = id_cell
            .and_then(cell_id)
            .ok_or_else(|| StoreError::InvalidRow {
                row: row_number,
                column: LedgerColumn::Id.header(),
                value: id_cell.map(cell_text).unwrap_or_default(),
            })?;

        Ok(MaintenanceRequestEntity {
            id,
            requester_name: self.text(row, LedgerColumn::RequesterName),
            requester_email: self.text(row, LedgerColumn::RequesterEmail),
            equipment: self.text(row, LedgerColumn::Equipment),
            description: self.text(row, LedgerColumn::Description),
            created_date: self.text(row, LedgerColumn::CreatedDate),
            status: self.text(row, LedgerColumn::Status),
        })
    }
}

/// Workbook row mapping for the ledger sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaintenanceRequestEntity {
    pub id: i64,
    pub requester_name: String,
    pub requester_email: String,
    pub equipment: String,
    pub description: String,
    pub created_date: String,
    pub status: String,
}

impl MaintenanceRequestEntity {
    /// Text of a column as it appears in the sheet.
    pub fn text(&self, column: LedgerColumn) -> String {
        match column {
            LedgerColumn::Id => self.id.to_string(),
            LedgerColumn::RequesterName => self.requester_name.clone(),
            LedgerColumn::RequesterEmail => self.requester_email.clone(),
            LedgerColumn::Equipment => self.equipment.clone(),
            LedgerColumn::Description => self.description.clone(),
            LedgerColumn::CreatedDate => self.created_date.clone(),
            LedgerColumn::Status => self.status.clone(),
        }
    }
}

impl From<MaintenanceRequestEntity> for MaintenanceRequest {
    fn from(entity: MaintenanceRequestEntity) -> Self {
        Self {
            id: entity.id,
            requester_name: entity.requester_name,
            requester_email: entity.requester_email,
            equipment: entity.equipment,
            description: entity.description,
            created_date: entity.created_date,
            status: RequestStatus::from_label(&entity.status),
        }
    }
}

impl From<&MaintenanceRequest> for MaintenanceRequestEntity {
    fn from(request: &MaintenanceRequest) -> Self {
        Self {
            id: request.id,
            requester_name: request.requester_name.clone(),
            requester_email: request.requester_email.clone(),
            equipment: request.equipment.clone(),
            description: request.description.clone(),
            created_date: request.created_date.clone(),
            status: request.status.label().to_string(),
        }
    }
}

/// Cell contents as text. Whole floats print without a decimal part.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(value) => decode_escapes(value),
        Data::Int(value) => value.to_string(),
        Data::Float(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
            format!("{value:.0}")
        }
        other => other.to_string(),
    }
}

/// Undoes the `_xHHHH_` escaping applied to shared strings on write.
///
/// Control characters such as `\r` are stored as `_x000D_`, and a literal
/// `_xHHHH_` is protected as `_x005F_xHHHH_`. Each escape is decoded once,
/// left to right, so decoded text is never rescanned.
pub fn decode_escapes(value: &str) -> String {
    if !value.contains("_x") {
        return value.to_string();
    }

    let mut decoded = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(start) = rest.find("_x") {
        decoded.push_str(&rest[..start]);
        let candidate = &rest[start..];
        match escaped_char(candidate) {
            Some(ch) => {
                decoded.push(ch);
                rest = &candidate[7..];
            }
            None => {
                decoded.push_str("_x");
                rest = &candidate[2..];
            }
        }
    }
    decoded.push_str(rest);
    decoded
}

/// Character encoded by a leading `_xHHHH_`, if `text` starts with one.
fn escaped_char(text: &str) -> Option<char> {
    if text.as_bytes().get(6) != Some(&b'_') {
        return None;
    }
    let hex = text.get(2..6)?;
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    char::from_u32(u32::from_str_radix(hex, 16).ok()?)
}

/// Reads an id stored as an integer, a whole float or numeric text.
fn cell_id(cell: &Data) -> Option<i64> {
    match cell {
        Data::Int(value) => Some(*value),
        Data::Float(value) if value.fract() == 0.0 && value.abs() < 9.0e15 => {
            Some(*value as i64)
        }
        Data::String(value) => value.trim().parse().ok(),
        _ => None,
    }
}

/// True when every cell of a row is empty.
pub fn is_blank_row(row: &[Data]) -> bool {
    row.iter()
        .all(|cell| matches!(cell, Data::Empty) || cell_text(cell).trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> Vec<Data> {
        LedgerColumn::ALL
            .iter()
            .map(|c| Data::String(c.header().to_string()))
            .collect()
    }

    fn row(id: Data, status: &str) -> Vec<Data> {
        vec![
            id,
            Data::String("Ana".into()),
            Data::String("ana@x.com".into()),
            Data::String("Printer-1".into()),
            Data::String("Jam".into()),
            Data::String("16/10/2026".into()),
            Data::String(status.into()),
        ]
    }

    #[test]
    fn test_headers_match_ledger_layout() {
        let headers: Vec<_> = LedgerColumn::ALL.iter().map(|c| c.header()).collect();
        assert_eq!(
            headers,
            vec!["ID", "Solicitante", "E-mail", "Equipamento", "Descrição", "Data", "Status"]
        );
    }

    #[test]
    fn test_entity_from_row() {
        let columns = LedgerColumns::from_header(&header()).unwrap();
        let entity = columns.entity(&row(Data::Float(3.0), "Aberta"), 2).unwrap();
        assert_eq!(entity.id, 3);
        assert_eq!(entity.requester_name, "Ana");
        assert_eq!(entity.status, "Aberta");

        let request = MaintenanceRequest::from(entity);
        assert_eq!(request.status, RequestStatus::Open);
    }

    #[test]
    fn test_entity_accepts_int_and_text_ids() {
        let columns = LedgerColumns::from_header(&header()).unwrap();
        assert_eq!(columns.entity(&row(Data::Int(7), "Aberta"), 2).unwrap().id, 7);
        assert_eq!(
            columns
                .entity(&row(Data::String(" 8 ".into()), "Aberta"), 2)
                .unwrap()
                .id,
            8
        );
    }

    #[test]
    fn test_entity_rejects_non_numeric_id() {
        let columns = LedgerColumns::from_header(&header()).unwrap();
        let err = columns
            .entity(&row(Data::String("abc".into()), "Aberta"), 5)
            .unwrap_err();
        match err {
            StoreError::InvalidRow { row, column, value } => {
                assert_eq!(row, 5);
                assert_eq!(column, "ID");
                assert_eq!(value, "abc");
            }
            other => panic!("Expected InvalidRow, got {other:?}"),
        }
    }

    #[test]
    fn test_columns_found_in_any_order() {
        let mut reordered = header();
        reordered.reverse();
        let columns = LedgerColumns::from_header(&reordered).unwrap();
        let mut data = row(Data::Int(2), "Concluída");
        data.reverse();
        let entity = columns.entity(&data, 2).unwrap();
        assert_eq!(entity.id, 2);
        assert_eq!(entity.equipment, "Printer-1");
        assert_eq!(entity.status, "Concluída");
    }

    #[test]
    fn test_missing_column_is_reported() {
        let mut partial = header();
        partial.pop();
        let err = LedgerColumns::from_header(&partial).unwrap_err();
        assert!(matches!(err, StoreError::MissingColumn("Status")));
    }

    #[test]
    fn test_short_row_reads_missing_cells_as_empty() {
        let columns = LedgerColumns::from_header(&header()).unwrap();
        let entity = columns.entity(&[Data::Int(1)], 2).unwrap();
        assert_eq!(entity.id, 1);
        assert_eq!(entity.description, "");
        assert_eq!(entity.status, "");
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&Data::Float(12.0)), "12");
        assert_eq!(cell_text(&Data::Float(1.5)), "1.5");
        assert_eq!(cell_text(&Data::Int(4)), "4");
        assert_eq!(cell_text(&Data::Empty), "");
    }

    #[test]
    fn test_cell_text_decodes_escapes() {
        let cell = Data::String("Jam_x000D_\nPaper".into());
        assert_eq!(cell_text(&cell), "Jam\r\nPaper");
    }

    #[test]
    fn test_decode_escapes() {
        assert_eq!(decode_escapes("ctl_x0001_x"), "ctl\u{1}x");
        assert_eq!(decode_escapes("_x005F_x0041_ lit"), "_x0041_ lit");
        assert_eq!(decode_escapes("a_x005f_b"), "a_b");
        assert_eq!(decode_escapes("plain text"), "plain text");
    }

    #[test]
    fn test_decode_escapes_leaves_partial_sequences() {
        assert_eq!(decode_escapes("_x"), "_x");
        assert_eq!(decode_escapes("_x00"), "_x00");
        assert_eq!(decode_escapes("_x00G1_"), "_x00G1_");
        assert_eq!(decode_escapes("_x0041"), "_x0041");
        assert_eq!(decode_escapes("_xção_"), "_xção_");
        assert_eq!(decode_escapes("__x0041_"), "_A");
    }

    #[test]
    fn test_is_blank_row() {
        assert!(is_blank_row(&[Data::Empty, Data::String("  ".into())]));
        assert!(!is_blank_row(&[Data::Empty, Data::Int(1)]));
    }
}
