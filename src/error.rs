//! Error types for table-snapshot.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - Category-based exit codes (2=query, 4=data, 7=config, 8=io)
//! - Operator-facing recovery hints

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for table-snapshot operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes grouped by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Query (exit 2)
    QueryError,

    // Row data (exit 4)
    MissingKeyColumn,
    UnsupportedValue,

    // Config (exit 7)
    ConfigError,

    // I/O (exit 8)
    IoError,
    JsonError,
}

impl ErrorCode {
    /// Category-based exit code.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::QueryError => 2,
            Self::MissingKeyColumn | Self::UnsupportedValue => 4,
            Self::ConfigError => 7,
            Self::IoError | Self::JsonError => 8,
        }
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur while snapshotting tables.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Query failed for table {table}: {source}")]
    Query {
        table: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Table not found: {table}")]
    TableNotFound { table: String },

    #[error("I/O error at {}: {source}", path.display())]
    FileSystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Row in table {table} has no value for primary key column {column}")]
    MissingKeyColumn { table: String, column: String },

    #[error("Unsupported value in {table}.{column}: {kind}")]
    UnsupportedValue {
        table: String,
        column: String,
        kind: &'static str,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Wrap an I/O error with the path it happened at.
    pub fn fs(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::FileSystem { path, source }
    }

    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Config(_) => ErrorCode::ConfigError,
            Self::Query { .. } | Self::TableNotFound { .. } => ErrorCode::QueryError,
            Self::FileSystem { .. } => ErrorCode::IoError,
            Self::MissingKeyColumn { .. } => ErrorCode::MissingKeyColumn,
            Self::UnsupportedValue { .. } => ErrorCode::UnsupportedValue,
            Self::Json(_) => ErrorCode::JsonError,
        }
    }

    /// Category-based exit code, delegating to the `ErrorCode`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.error_code().exit_code()
    }

    /// Recovery hint for the operator.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::TableNotFound { table } => Some(format!(
                "Check that '{table}' is spelled correctly in the `tables` list \
                 and exists in the configured database."
            )),
            Self::FileSystem { .. } => Some(
                "The table directory may be partially updated. \
                 Fix the problem and re-run; completed tables are not affected."
                    .to_string(),
            ),
            Self::MissingKeyColumn { column, .. } => Some(format!(
                "The query result did not include primary key column '{column}'. \
                 No file was written for this row."
            )),
            Self::UnsupportedValue { .. } => Some(
                "Only NULL, integer, real and text columns can be snapshotted. \
                 Cast the column to text in a view and snapshot the view instead."
                    .to_string(),
            ),
            Self::Config(_) | Self::Query { .. } | Self::Json(_) => None,
        }
    }
}
