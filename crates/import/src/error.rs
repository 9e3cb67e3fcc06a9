use thiserror::Error;

use crate::decode::DecodeError;
use crate::sheet::TableReadError;

/// Batch-level failures. Each one aborts the whole import; row-level problems
/// never surface here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    #[error("No file content supplied")]
    MissingInput,
    #[error("Could not parse file: {0}")]
    DecodeFailed(String),
    #[error("File contains fewer than 2 rows")]
    TooFewRows,
    #[error("No spreadsheet reader is available")]
    SpreadsheetReaderUnavailable,
    #[error("Workbook contains no sheets")]
    NoSheetsFound,
    #[error("First sheet contains no data rows")]
    SpreadsheetEmpty,
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl ImportError {
    /// Stable machine-readable reason.
    pub fn code(&self) -> &'static str {
        match self {
            ImportError::MissingInput => "missing-input",
            ImportError::DecodeFailed(_) => "decode-failed",
            ImportError::TooFewRows => "too-few-rows",
            ImportError::SpreadsheetReaderUnavailable => "spreadsheet-reader-unavailable",
            ImportError::NoSheetsFound => "no-sheets-found",
            ImportError::SpreadsheetEmpty => "spreadsheet-empty",
            ImportError::InvalidArgument(_) => "invalid-argument",
        }
    }
}

impl From<DecodeError> for ImportError {
    fn from(e: DecodeError) -> Self {
        match e {
            DecodeError::UnknownEncoding(label) => {
                ImportError::InvalidArgument(format!("unknown encoding '{label}'"))
            }
            other => ImportError::DecodeFailed(other.to_string()),
        }
    }
}

impl From<TableReadError> for ImportError {
    fn from(e: TableReadError) -> Self {
        ImportError::DecodeFailed(e.to_string())
    }
}

impl From<csv::Error> for ImportError {
    fn from(e: csv::Error) -> Self {
        ImportError::DecodeFailed(e.to_string())
    }
}
