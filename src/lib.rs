//! xlreport - summary reports from loosely structured spreadsheets
//!
//! This library extracts facts from sales transaction logs and manufacturing
//! batch sheets and builds single-sheet summary workbooks.
//!
//! # Reports
//!
//! - Sales: purchase quantities bucketed by product and month, with product
//!   codes either discovered from the data or taken from a key workbook
//! - Manufactured: product, manufacture date, lot number and lot size from
//!   many batch sheets, combined into one table in input order
//!
//! # Example
//!
//! ```no_run
//! use xlreport::config::ReportKind;
//! use xlreport::core::generate;
//! use xlreport::types::Category;
//! use std::path::PathBuf;
//!
//! let kind = ReportKind::for_category(Category::Manufactured);
//! let inputs = vec![PathBuf::from("lot-101.xlsx"), PathBuf::from("lot-102.xlsx")];
//! let report = generate(&kind, &inputs, None)?;
//!
//! println!("Rows: {}", report.table.row_count());
//! report.write(std::path::Path::new("ManufacturedReport.xlsx"))?;
//! # Ok::<(), xlreport::error::ReportError>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod excel;
pub mod types;

// Re-export commonly used types
pub use error::{ReportError, ReportResult};
pub use types::{BatchRecord, Category, CellValue, ReportTable};
