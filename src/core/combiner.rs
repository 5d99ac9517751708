//! Sequential multi-workbook batch combination

use crate::config::{FailurePolicy, ManufacturedOptions};
use crate::core::batch::BatchExtractor;
use crate::error::{ReportError, ReportResult};
use crate::excel::{ExcelImporter, Workbook};
use crate::types::ReportTable;
use std::path::PathBuf;
use tracing::{info, warn};

/// Something that yields one decoded workbook
pub trait WorkbookSource {
    /// Name used in logs and skip reports
    fn name(&self) -> String;

    /// Read and decode the workbook
    fn load(&self) -> ReportResult<Workbook>;
}

/// Spreadsheet document already held in memory
#[derive(Debug, Clone)]
pub struct InputFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl InputFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

impl WorkbookSource for InputFile {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn load(&self) -> ReportResult<Workbook> {
        ExcelImporter::from_bytes(self.name.clone(), self.bytes.clone()).import()
    }
}

impl WorkbookSource for Workbook {
    fn name(&self) -> String {
        Workbook::name(self).to_string()
    }

    fn load(&self) -> ReportResult<Workbook> {
        Ok(self.clone())
    }
}

impl WorkbookSource for PathBuf {
    fn name(&self) -> String {
        self.display().to_string()
    }

    fn load(&self) -> ReportResult<Workbook> {
        ExcelImporter::open(self)
    }
}

/// An input that contributed no row, and why
#[derive(Debug)]
pub struct SkippedInput {
    pub name: String,
    pub error: ReportError,
}

/// Rows from every usable input under a single header
#[derive(Debug)]
pub struct CombinedReport {
    pub table: ReportTable,
    pub skipped: Vec<SkippedInput>,
}

/// Runs the batch extractor over many workbooks, in input order
pub struct Combiner<'a> {
    options: &'a ManufacturedOptions,
}

impl<'a> Combiner<'a> {
    pub fn new(options: &'a ManufacturedOptions) -> Self {
        Self { options }
    }

    /// Combine one row per source.
    ///
    /// Sources are loaded one at a time so rows keep input order. Per-input
    /// failures are collected in `skipped` unless the policy is `Abort`.
    pub fn combine<S: WorkbookSource>(&self, sources: &[S]) -> ReportResult<CombinedReport> {
        if sources.is_empty() {
            return Err(ReportError::NoInputSelected);
        }

        let extractor = BatchExtractor::new(self.options);
        let mut table = extractor.header();
        let mut skipped = Vec::new();

        for source in sources {
            let name = source.name();
            let row = source.load().and_then(|workbook| extractor.extract_row(&workbook));

            match row {
                Ok(row) => {
                    info!(input = %name, "added batch row");
                    table.push_row(row)?;
                }
                Err(error) if error.is_recoverable() => {
                    if self.options.on_failure == FailurePolicy::Abort {
                        return Err(error);
                    }
                    warn!(input = %name, %error, "skipping input");
                    skipped.push(SkippedInput { name, error });
                }
                Err(error) => return Err(error),
            }
        }

        if table.is_empty() {
            return Err(ReportError::NoDataProduced);
        }

        Ok(CombinedReport { table, skipped })
    }
}
