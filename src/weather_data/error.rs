use polars::error::PolarsError;
use thiserror::Error;

/// A reply from the VCSN API did not have the expected shape.
#[derive(Debug, Error)]
pub enum ReplyFormatError {
    #[error("Reply has no '{0}' field")]
    MissingField(&'static str),

    #[error("Field '{field}' is not a valid date: {value}")]
    InvalidDate { field: &'static str, value: String },

    #[error("Record {index} of the data array is malformed")]
    MalformedRecord {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Record {index} has an unparseable validityTime '{value}'")]
    InvalidTimestamp { index: usize, value: String },

    #[error("Failed to build DataFrame from reply: {0}")]
    DataFrame(#[from] PolarsError),
}
