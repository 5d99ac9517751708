//! Excel exporter implementation - report table → .xlsx

use crate::error::{ReportError, ReportResult};
use crate::types::{CellValue, ReportTable};
use rust_xlsxwriter::{Workbook, Worksheet};
use std::path::Path;

/// Writes a [`ReportTable`] verbatim into a single-sheet workbook
pub struct ExcelExporter<'a> {
    table: &'a ReportTable,
    sheet_name: String,
}

impl<'a> ExcelExporter<'a> {
    /// Create a new Excel exporter
    pub fn new(table: &'a ReportTable, sheet_name: impl Into<String>) -> Self {
        Self {
            table,
            sheet_name: sheet_name.into(),
        }
    }

    /// Serialize the report to .xlsx bytes
    pub fn to_bytes(&self) -> ReportResult<Vec<u8>> {
        let mut workbook = self.build()?;
        workbook
            .save_to_buffer()
            .map_err(|e| ReportError::Export(format!("Failed to serialize workbook: {}", e)))
    }

    /// Serialize the report and write it to `output_path`
    pub fn export(&self, output_path: &Path) -> ReportResult<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(output_path, bytes)?;
        Ok(())
    }

    fn build(&self) -> ReportResult<Workbook> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(&self.sheet_name)
            .map_err(|e| ReportError::Export(format!("Failed to set worksheet name: {}", e)))?;

        for (row_idx, row) in self.table.to_rows().iter().enumerate() {
            let row_num = u32::try_from(row_idx)
                .map_err(|_| ReportError::Export(format!("Row {} out of range", row_idx)))?;
            for (col_idx, value) in row.iter().enumerate() {
                let col_num = u16::try_from(col_idx).map_err(|_| {
                    ReportError::Export(format!("Column {} out of range", col_idx))
                })?;
                Self::write_cell(worksheet, row_num, col_num, value)?;
            }
        }

        Ok(workbook)
    }

    /// Write one value with no formatting
    fn write_cell(
        worksheet: &mut Worksheet,
        row: u32,
        col: u16,
        value: &CellValue,
    ) -> ReportResult<()> {
        let result = match value {
            CellValue::Text(s) => worksheet.write_string(row, col, s),
            CellValue::Number(n) => worksheet.write_number(row, col, *n),
            CellValue::Integer(i) => worksheet.write_number(row, col, *i as f64),
            CellValue::Boolean(b) => worksheet.write_boolean(row, col, *b),
        };
        result
            .map(|_| ())
            .map_err(|e| ReportError::Export(format!("Failed to write cell: {}", e)))
    }
}
