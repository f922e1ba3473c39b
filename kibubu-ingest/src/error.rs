use thiserror::Error;

/// Failures that abort a whole extraction.
///
/// Blocks without an amount and blocks without a service charge are not
/// errors; they are dropped or defaulted by the extractor.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("malformed {field} value {raw:?} in block dated {date}")]
    MalformedNumber {
        date: String,
        field: &'static str,
        raw: String,
    },
    #[error("invalid statement pattern: {0}")]
    Pattern(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, IngestError>;
