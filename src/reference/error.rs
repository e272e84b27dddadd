use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

/// A reference table could not be loaded.
#[derive(Debug, Error)]
pub enum ReferenceTableError {
    #[error("Failed to read reference table '{0}'")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse reference table '{table}' as CSV")]
    CsvParse {
        table: String,
        #[source]
        source: PolarsError,
    },

    #[error("Reference table '{table}' has no column '{column}'")]
    MissingColumn {
        table: String,
        column: String,
        #[source]
        source: PolarsError,
    },

    #[error("Column '{column}' of reference table '{table}' has a missing or invalid value in row {row}")]
    InvalidValue {
        table: String,
        column: String,
        row: usize,
    },

    #[error("Row {row} of reference table '{table}' uses the reserved measurement name '{name}'")]
    ReservedName {
        table: String,
        name: String,
        row: usize,
    },

    #[error("Reference table '{0}' contains no rows")]
    Empty(String),
}
