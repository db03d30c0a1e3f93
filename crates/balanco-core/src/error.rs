//! Error types for the balanco-core library.
//!
//! Data-quality problems (unmatched patterns, malformed numbers,
//! unplaceable records) are never errors: extraction defaults the field and
//! population skips the write. Errors here cover the workbook backend only.

use thiserror::Error;

/// Main error type for the balanco library.
#[derive(Error, Debug)]
pub enum BalancoError {
    /// Workbook backend error.
    #[error("workbook error: {0}")]
    Workbook(#[from] WorkbookError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to loading and saving workbooks.
#[derive(Error, Debug)]
pub enum WorkbookError {
    /// Failed to open/parse the xlsx file.
    #[error("failed to read workbook: {0}")]
    Read(String),

    /// Failed to serialize the xlsx file.
    #[error("failed to write workbook: {0}")]
    Write(String),
}

/// Result type for the balanco library.
pub type Result<T> = std::result::Result<T, BalancoError>;
