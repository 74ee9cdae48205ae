use hydro_utils::error::DateError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeriesError {
    #[error("header has {found} lines, expected {expected}")]
    ShortHeader { found: usize, expected: usize },

    #[error("header line {line} is missing its {field} value")]
    HeaderField { line: usize, field: &'static str },

    #[error("{source_name} did not contain any data rows")]
    EmptyData { source_name: String },

    #[error("output line {line} invalid: {message}")]
    OutputRow { line: usize, message: String },

    #[error(transparent)]
    Date(#[from] DateError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
