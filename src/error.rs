use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type covering the different failure cases that can occur when the
/// tool ingests the two expenditure exports or emits the report.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when JSON serialization of the summary statistics fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors bubbled up from the ODS reader implementation.
    #[error("ODS read error: {0}")]
    OdsRead(#[from] calamine::OdsError),

    /// Raised when a sheet does not follow the expected layout, e.g. the
    /// positional columns of the GESLAB export are out of range.
    #[error("invalid spreadsheet layout: {0}")]
    InvalidLayout(String),

    /// Raised when a named column is absent from an export's header row.
    #[error("missing column '{column}' in {export} export")]
    MissingColumn { export: String, column: String },

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
