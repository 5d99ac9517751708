//! Report engine: label location, purchase parsing, monthly aggregation,
//! batch extraction and multi-file combination

pub mod aggregator;
pub mod batch;
pub mod combiner;
pub mod dates;
pub mod engine;
pub mod locator;
pub mod products;

pub use aggregator::{MonthlyAggregator, MonthlyReport, ProductRecord};
pub use batch::BatchExtractor;
pub use combiner::{CombinedReport, Combiner, InputFile, SkippedInput, WorkbookSource};
pub use dates::{MonthFormat, MonthKey};
pub use engine::{generate, output_file_name, sales_report, GeneratedReport};
pub use locator::CellLocator;
pub use products::{ProductExtractor, ProductVocabulary, Purchase};
