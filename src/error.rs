use thiserror::Error;

pub type ReportResult<T> = Result<T, ReportError>;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("Sheet not found: {0}")]
    MissingSheet(String),

    #[error("One or more required cells are missing in '{sheet}': {}", .fields.join(", "))]
    MissingRequiredCells {
        sheet: String,
        fields: Vec<&'static str>,
    },

    #[error("Error reading Excel file '{name}': {reason}")]
    MalformedDocument { name: String, reason: String },

    #[error("No input files selected")]
    NoInputSelected,

    #[error("No data to generate report")]
    NoDataProduced,

    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    #[error("Row has {found} columns, header has {expected}")]
    RaggedRow { expected: usize, found: usize },

    #[error("Export error: {0}")]
    Export(String),
}

impl ReportError {
    /// True for failures scoped to a single input file or sheet.
    ///
    /// These are skipped in multi-file runs; everything else ends the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ReportError::MissingSheet(_)
                | ReportError::MissingRequiredCells { .. }
                | ReportError::MalformedDocument { .. }
                | ReportError::Io(_)
        )
    }
}
