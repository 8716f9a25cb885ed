//! Output-subsystem error type.

use thiserror::Error;

/// Errors from serialization and import. Import failures are
/// non-retryable; the caller surfaces them directly.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("unsupported import: {0}")]
    UnsupportedImport(String),

    #[error("import produced no usable data: {0}")]
    EmptyImport(String),

    #[error("XML parse error: {0}")]
    Xml(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type OutputResult<T> = Result<T, OutputError>;
