//! Excel importer implementation - spreadsheet bytes → workbook model

use crate::error::{ReportError, ReportResult};
use crate::excel::model::{CellAddress, Sheet, SheetRange, Workbook};
use crate::types::CellValue;
use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// Decodes .xls/.xlsx/.xlsm/.xlsb/.ods documents into a [`Workbook`]
pub struct ExcelImporter {
    name: String,
    bytes: Vec<u8>,
}

impl ExcelImporter {
    /// Create an importer over an in-memory document
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read a document from disk and decode it
    pub fn open<P: AsRef<Path>>(path: P) -> ReportResult<Workbook> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        Self::from_bytes(path.display().to_string(), bytes).import()
    }

    /// Decode every sheet of the document
    pub fn import(self) -> ReportResult<Workbook> {
        let malformed = |reason: String| ReportError::MalformedDocument {
            name: self.name.clone(),
            reason,
        };

        let mut sheets = open_workbook_auto_from_rs(Cursor::new(self.bytes.as_slice()))
            .map_err(|e| malformed(e.to_string()))?;

        let mut workbook = Workbook::new(self.name.clone());
        let sheet_names = sheets.sheet_names().to_vec();

        for sheet_name in sheet_names {
            let range = match sheets.worksheet_range(&sheet_name) {
                Ok(range) => range,
                Err(e) => {
                    debug!(
                        workbook = %self.name,
                        sheet = %sheet_name,
                        error = %e,
                        "sheet could not be decoded"
                    );
                    workbook.add_sheet(Sheet::unreadable(&sheet_name, e.to_string()));
                    continue;
                }
            };
            let sheet = Self::convert_range(&sheet_name, &range);
            debug!(
                workbook = %self.name,
                sheet = %sheet_name,
                cells = sheet.cells().count(),
                "decoded sheet"
            );
            workbook.add_sheet(sheet);
        }

        Ok(workbook)
    }

    /// Copy a calamine range into a sparse sheet with absolute addresses
    fn convert_range(sheet_name: &str, range: &Range<Data>) -> Sheet {
        let mut sheet = Sheet::new(sheet_name);

        let (Some(start), Some(end)) = (range.start(), range.end()) else {
            return sheet; // Empty sheet
        };

        for (row, col, cell) in range.used_cells() {
            if let Some(value) = Self::convert_cell(cell) {
                let addr = CellAddress::new(start.0 + row as u32, start.1 + col as u32);
                sheet.set(addr, value);
            }
        }

        // Keep the declared dimensions even when trailing cells are blank
        sheet.declare_range(SheetRange {
            start: CellAddress::new(start.0, start.1),
            end: CellAddress::new(end.0, end.1),
        });

        sheet
    }

    /// Map a calamine cell to a model value; empty and error cells are absent
    fn convert_cell(cell: &Data) -> Option<CellValue> {
        match cell {
            Data::String(s) => Some(CellValue::Text(s.clone())),
            Data::Float(f) => Some(CellValue::Number(*f)),
            Data::Int(i) => Some(CellValue::Integer(*i)),
            Data::Bool(b) => Some(CellValue::Boolean(*b)),
            Data::DateTime(dt) => Some(CellValue::Number(dt.as_f64())),
            Data::DateTimeIso(s) | Data::DurationIso(s) => Some(CellValue::Text(s.clone())),
            Data::Error(_) | Data::Empty => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_cell_values() {
        assert_eq!(
            ExcelImporter::convert_cell(&Data::String("Lot #".to_string())),
            Some(CellValue::from("Lot #"))
        );
        assert_eq!(
            ExcelImporter::convert_cell(&Data::Float(45413.0)),
            Some(CellValue::Number(45413.0))
        );
        assert_eq!(
            ExcelImporter::convert_cell(&Data::Int(7)),
            Some(CellValue::Integer(7))
        );
        assert_eq!(ExcelImporter::convert_cell(&Data::Empty), None);
    }

    #[test]
    fn test_convert_range_uses_absolute_addresses() {
        let mut range: Range<Data> = Range::new((2, 1), (3, 2));
        range.set_value((2, 1), Data::String("lot #".to_string()));
        range.set_value((2, 2), Data::String("L-100".to_string()));
        range.set_value((3, 2), Data::Empty);

        let sheet = ExcelImporter::convert_range("Batch", &range);

        assert_eq!(
            sheet.cell_at("B3").unwrap(),
            Some(&CellValue::from("lot #"))
        );
        assert_eq!(
            sheet.cell_at("C3").unwrap(),
            Some(&CellValue::from("L-100"))
        );
        assert_eq!(sheet.cell_at("C4").unwrap(), None);
        assert_eq!(sheet.range().unwrap().to_string(), "B3:C4");
    }

    #[test]
    fn test_import_garbage_is_malformed() {
        let importer = ExcelImporter::from_bytes("broken.xlsx", b"not a spreadsheet".to_vec());
        match importer.import() {
            Err(ReportError::MalformedDocument { name, .. }) => assert_eq!(name, "broken.xlsx"),
            other => panic!("Expected MalformedDocument, got {:?}", other),
        }
    }
}
