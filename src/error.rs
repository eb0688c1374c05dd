//! Error types for row pipelines and table sources

use std::path::PathBuf;

use thiserror::Error;

use crate::model::{CellType, CellValue};

/// Errors surfaced by table sources and row pipelines.
///
/// Per-cell cast failures are not represented here: they are recovered inside
/// the pipeline (see [`CastError`]).
#[derive(Debug, Error)]
pub enum Error {
    /// Dict projection was requested on a RowSet without column headers.
    #[error("no column headers are defined")]
    NoColumnHeaders,

    /// A single-pass row source was asked for a second pass.
    #[error("row source has already been consumed")]
    SourceConsumed,

    /// Failed to open a file.
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Malformed delimited text.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Failed to decode a spreadsheet workbook.
    #[error("workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("no sheets found in workbook")]
    EmptyWorkbook,

    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("table not found: {0}")]
    TableNotFound(String),
}

impl Error {
    /// True for usage errors caused by how a RowSet was configured.
    pub fn is_config_error(&self) -> bool {
        matches!(self, Error::NoColumnHeaders)
    }
}

/// A value that the target type cannot represent.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("cannot cast {value:?} to {target}")]
pub struct CastError {
    pub value: CellValue,
    pub target: CellType,
}

/// Result type for table and row operations.
pub type Result<T> = std::result::Result<T, Error>;
