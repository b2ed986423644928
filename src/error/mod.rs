//! Error handling for the establishment reader.
//!
//! Fallible functions return [`Result`], an `anyhow` result carrying context.
//! Failures a caller may want to react to are raised as [`Error`] and can be
//! recovered with `err.downcast_ref::<Error>()`.

pub mod util;

use std::io;
use std::path::PathBuf;

use arrow::error::ArrowError;
use rust_xlsxwriter::XlsxError;

/// Typed failures raised by the data layer
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No partition could be loaded
    #[error("No data available: none of the {attempted} partition(s) could be loaded")]
    NoDataAvailable {
        /// Number of partitions that were attempted
        attempted: usize,
    },

    /// A column required by an operation is missing from the table
    #[error("Column '{column}' not found")]
    ColumnNotFound {
        /// Column name
        column: String,
    },

    /// A column exists but holds an unexpected Arrow type
    #[error("Column '{column}' is not a {expected} array")]
    ColumnType {
        /// Column name
        column: String,
        /// Human readable name of the expected type
        expected: &'static str,
    },

    /// A partition does not fit the table layout
    #[error("Schema mismatch in {}: {reason}", path.display())]
    SchemaMismatch {
        /// Partition path
        path: PathBuf,
        /// What did not match
        reason: String,
    },

    /// The activity description lookup could not be built
    #[error("Lookup error: {0}")]
    Lookup(String),

    /// The boundary feature collection could not be read
    #[error("Boundary error: {0}")]
    Boundary(String),

    /// File access error
    #[error("IO error for {}: {message}", path.display())]
    Path {
        /// Path that was being accessed
        path: PathBuf,
        /// What went wrong
        message: String,
        /// Underlying error, if any
        #[source]
        source: Option<io::Error>,
    },

    /// Arrow error
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Spreadsheet writer error
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] XlsxError),
}

impl Error {
    /// Shorthand for [`Error::ColumnNotFound`]
    pub fn column_not_found(column: impl Into<String>) -> Self {
        Self::ColumnNotFound {
            column: column.into(),
        }
    }

    /// Shorthand for a path error without an underlying source
    pub fn path(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Path {
            path: path.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Shorthand for a path error wrapping an IO error
    pub fn path_with_source(
        path: impl Into<PathBuf>,
        message: impl Into<String>,
        source: io::Error,
    ) -> Self {
        Self::Path {
            path: path.into(),
            message: message.into(),
            source: Some(source),
        }
    }
}

/// Result type for establishment reader operations
pub type Result<T> = anyhow::Result<T>;
