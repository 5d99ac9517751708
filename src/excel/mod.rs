//! Spreadsheet I/O and the in-memory workbook model
//!
//! - Import: .xls/.xlsx bytes → [`Workbook`]
//! - Export: [`crate::types::ReportTable`] → single-sheet .xlsx

mod exporter;
mod importer;
pub mod model;

pub use exporter::ExcelExporter;
pub use importer::ExcelImporter;
pub use model::{CellAddress, Sheet, SheetRange, Workbook};
