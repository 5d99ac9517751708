//! End-to-end report runs: inputs → table → .xlsx bytes

use crate::config::{ReportKind, SalesOptions};
use crate::core::aggregator::MonthlyAggregator;
use crate::core::combiner::{Combiner, SkippedInput, WorkbookSource};
use crate::core::products::ProductVocabulary;
use crate::error::{ReportError, ReportResult};
use crate::excel::{ExcelExporter, Workbook};
use crate::types::{Category, ReportTable};
use std::path::Path;
use tracing::{info, warn};

/// A finished report, ready to serialize
#[derive(Debug)]
pub struct GeneratedReport {
    pub category: Category,
    pub sheet_name: &'static str,
    pub table: ReportTable,
    /// Inputs that were skipped during a multi-file run
    pub skipped: Vec<SkippedInput>,
}

impl GeneratedReport {
    /// Serialize to a single-sheet .xlsx document
    pub fn to_xlsx(&self) -> ReportResult<Vec<u8>> {
        ExcelExporter::new(&self.table, self.sheet_name).to_bytes()
    }

    pub fn write(&self, output: &Path) -> ReportResult<()> {
        ExcelExporter::new(&self.table, self.sheet_name).export(output)
    }
}

/// Build the sales table from a transaction workbook and an optional key.
///
/// Both workbooks are read from their first sheet.
pub fn sales_report(
    workbook: &Workbook,
    key: Option<&Workbook>,
    options: &SalesOptions,
) -> ReportResult<ReportTable> {
    let sheet = workbook.first_sheet()?;
    let vocabulary = match key {
        Some(key_book) => Some(ProductVocabulary::from_key_sheet(
            key_book.first_sheet()?,
            options.key_has_header,
        )),
        None => None,
    };

    let rows = sheet.rows();
    info!(workbook = %workbook.name(), rows = rows.len(), "aggregating sales");
    MonthlyAggregator::new(options)
        .aggregate(&rows, vocabulary)
        .to_table()
}

/// Run a report of the given kind.
///
/// Sales reads the first input (plus `key` when given); manufactured
/// combines every input in order. Zero data rows is `NoDataProduced`.
pub fn generate<S: WorkbookSource>(
    kind: &ReportKind,
    inputs: &[S],
    key: Option<&S>,
) -> ReportResult<GeneratedReport> {
    if inputs.is_empty() {
        return Err(ReportError::NoInputSelected);
    }

    let (table, skipped) = match kind {
        ReportKind::Sales(options) => {
            if inputs.len() > 1 {
                warn!(
                    ignored = inputs.len() - 1,
                    "sales report reads a single workbook; extra inputs ignored"
                );
            }
            let workbook = inputs[0].load()?;
            let key_book = key.map(|k| k.load()).transpose()?;
            let table = sales_report(&workbook, key_book.as_ref(), options)?;
            (table, Vec::new())
        }
        ReportKind::Manufactured(options) => {
            let combined = Combiner::new(options).combine(inputs)?;
            (combined.table, combined.skipped)
        }
    };

    if table.is_empty() {
        return Err(ReportError::NoDataProduced);
    }

    info!(
        category = %kind.category(),
        rows = table.row_count(),
        skipped = skipped.len(),
        "report generated"
    );

    Ok(GeneratedReport {
        category: kind.category(),
        sheet_name: kind.sheet_name(),
        table,
        skipped,
    })
}

/// Default output file name.
///
/// Sales reports insert "Report" before the source file's extension
/// (`may.xlsx` → `mayReport.xlsx`); other reports are `<Category>Report.xlsx`.
pub fn output_file_name(category: Category, source: Option<&Path>) -> String {
    match (category, source.and_then(Path::file_stem)) {
        (Category::Sales, Some(stem)) => format!("{}Report.xlsx", stem.to_string_lossy()),
        _ => format!("{}Report.xlsx", category.name()),
    }
}
