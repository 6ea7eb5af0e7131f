//! Error types for store access, query execution and audit logging.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors reported by a graph store backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Backend could not be reached.
    #[error("{backend} backend unavailable: {reason}")]
    Unavailable {
        /// Name of the backend.
        backend: String,
        /// Transport-level reason.
        reason: String,
    },

    /// Backend call exceeded its timeout.
    #[error("store call timed out after {0:?}")]
    Timeout(Duration),

    /// Backend rejected the query itself.
    #[error("invalid store query: {0}")]
    InvalidQuery(String),
}

impl StoreError {
    /// Creates an unavailable error for the named backend.
    pub fn unavailable(backend: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            backend: backend.into(),
            reason: reason.into(),
        }
    }

    /// Returns true for connection and timeout failures.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. } | Self::Timeout(_))
    }
}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors that abort a query.
#[derive(Error, Debug)]
pub enum QueryError {
    /// Required caller input missing or blank. The store was not touched.
    #[error("input error: {0}")]
    InvalidInput(String),

    /// Store connection or timeout failure. Nothing was logged.
    #[error("store unavailable: {0}")]
    StoreUnavailable(StoreError),

    /// Any other store failure.
    #[error("store error: {0}")]
    Store(StoreError),

    /// A traversal pattern failed to parse.
    #[error("pattern error: {0}")]
    Pattern(#[from] hetio_pattern::PatternError),
}

impl From<StoreError> for QueryError {
    fn from(err: StoreError) -> Self {
        if err.is_unavailable() {
            QueryError::StoreUnavailable(err)
        } else {
            QueryError::Store(err)
        }
    }
}

/// Result type for query operations.
pub type QueryResult<T> = std::result::Result<T, QueryError>;

/// Errors from the audit log sink. Never fatal to a query.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LogSinkError {
    /// Appending an entry failed.
    #[error("log append failed: {0}")]
    Append(String),

    /// Reading back entries failed.
    #[error("log read failed: {0}")]
    Read(String),

    /// Writing an export file failed.
    #[error("log export to {path} failed: {message}")]
    Export {
        /// Target file.
        path: PathBuf,
        /// Underlying I/O or encoding error.
        message: String,
    },
}

impl LogSinkError {
    /// Creates an export error with path context.
    pub fn export(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Export {
            path: path.into(),
            message: message.to_string(),
        }
    }
}
