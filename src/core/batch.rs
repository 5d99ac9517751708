//! Lot number, manufacture date and lot size from one production sheet

use crate::config::{BatchLayout, FixedCells, LabelSynonyms, ManufacturedOptions};
use crate::core::locator::{display_date, CellLocator};
use crate::error::ReportResult;
use crate::excel::{CellAddress, Sheet, Workbook};
use crate::types::{BatchRecord, CellValue, ReportTable};
use tracing::{debug, warn};

const LABEL_SCAN_HEADER: [&str; 4] = ["Product", "Date", "Lot #", "Number of kits"];
const FIXED_CELLS_HEADER: [&str; 3] = ["Date", "Lot #", "Number of kits"];

/// Extracts a [`BatchRecord`] per workbook using the configured layout
pub struct BatchExtractor<'a> {
    options: &'a ManufacturedOptions,
}

impl<'a> BatchExtractor<'a> {
    pub fn new(options: &'a ManufacturedOptions) -> Self {
        Self { options }
    }

    /// Header row matching [`extract_row`](Self::extract_row) output
    pub fn header(&self) -> ReportTable {
        match self.options.layout {
            BatchLayout::LabelScan => ReportTable::new(LABEL_SCAN_HEADER),
            BatchLayout::FixedCells => ReportTable::new(FIXED_CELLS_HEADER),
        }
    }

    /// Resolve the record fields; unresolved fields stay `None`
    pub fn extract(&self, workbook: &Workbook) -> ReportResult<BatchRecord> {
        match self.options.layout {
            BatchLayout::LabelScan => {
                let sheet = workbook.first_sheet()?;
                Ok(self.scan_labels(sheet, &self.options.labels))
            }
            BatchLayout::FixedCells => {
                let cells = &self.options.fixed_cells;
                let sheet = workbook.require_sheet(&cells.sheet)?;
                self.read_fixed_cells(sheet, cells)
            }
        }
    }

    /// One complete data row, or `MissingRequiredCells`
    pub fn extract_row(&self, workbook: &Workbook) -> ReportResult<Vec<CellValue>> {
        let record = self.extract(workbook)?;
        let with_product = self.options.layout == BatchLayout::LabelScan;
        record.into_row(with_product).inspect_err(|e| {
            warn!(workbook = %workbook.name(), error = %e, "batch extraction failed");
        })
    }

    /// Header plus the single data row for one workbook
    pub fn extract_table(&self, workbook: &Workbook) -> ReportResult<ReportTable> {
        let mut table = self.header();
        table.push_row(self.extract_row(workbook)?)?;
        Ok(table)
    }

    fn scan_labels(&self, sheet: &Sheet, labels: &LabelSynonyms) -> BatchRecord {
        let locator = CellLocator::new(sheet);

        let product = sheet
            .cell(CellAddress::new(0, 0))
            .filter(|v| !v.is_blank())
            .cloned()
            .unwrap_or_else(|| CellValue::from(self.options.fallback_product.as_str()));
        debug!(sheet = %sheet.name(), %product, "product name");

        BatchRecord {
            sheet: sheet.name().to_string(),
            product: Some(product),
            lot_number: locator.value_beside(&labels.lot_number),
            manufacture_date: locator.date_beside(&labels.manufacture_date),
            lot_size: locator.value_beside(&labels.lot_size),
        }
    }

    fn read_fixed_cells(&self, sheet: &Sheet, cells: &FixedCells) -> ReportResult<BatchRecord> {
        let read = |reference: &str| -> ReportResult<Option<CellValue>> {
            Ok(sheet.cell_at(reference)?.filter(|v| !v.is_blank()).cloned())
        };

        Ok(BatchRecord {
            sheet: sheet.name().to_string(),
            product: None,
            lot_number: read(&cells.lot_number)?,
            manufacture_date: read(&cells.manufacture_date)?.map(display_date),
            lot_size: read(&cells.lot_size)?,
        })
    }
}
