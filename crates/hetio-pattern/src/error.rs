//! Error types for schema names and pattern parsing.

use thiserror::Error;

/// Errors that can occur while parsing schema names or hop patterns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// Parse error at a specific position in the input.
    #[error("parse error at position {position}: {message}")]
    ParseError {
        /// Byte position in the input where the error occurred.
        position: usize,
        /// Description of the error.
        message: String,
    },

    /// Pattern is incomplete.
    #[error("pattern is incomplete: {0}")]
    Incomplete(String),

    /// Empty input provided.
    #[error("empty pattern")]
    EmptyPattern,

    /// Node kind name outside the HetioNet schema.
    #[error("unknown node kind: {0}")]
    UnknownKind(String),

    /// Metaedge code outside the HetioNet schema.
    #[error("unknown metaedge: {0}")]
    UnknownMetaedge(String),
}

/// Result type for pattern operations.
pub type PatternResult<T> = std::result::Result<T, PatternError>;
