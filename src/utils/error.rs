//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that can occur during trace parsing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("No event header found in non-empty trace input")]
    NoEventHeader,

    /// A field that identifies the record could not be extracted.
    /// Never surfaces to callers: the span is passed through as unrecognized.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),

    #[error("Invalid record on line {line}: {message}")]
    InvalidRecord { line: usize, message: String },
}
