//! Core error definitions for the table exporter.
//!
//! This module provides a centralized `ExportError` enum and a `Result` type
//! used throughout the crate to handle fetch, serialization, and I/O errors.

use thiserror::Error;

/// Error types encountered during the export process.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// The data source could not produce a page (connection loss, bad query).
    /// The job transitions to `Error` and the partial output file is kept.
    #[error("Fetch failed: {0}")]
    Fetch(String),

    /// A serializer plugin failed to render a header, footer, or chunk.
    #[error("Serialization failed: {0}")]
    Serialize(String),

    /// Sink failure: truncate, append, stat, or delete.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The job was cancelled, either by an external `abort()` call or by the
    /// source reporting no page at all. Carries no message: callers branch on
    /// the variant. The partial output file has been deleted on this path.
    #[error("export aborted")]
    Aborted,
}

impl From<serde_json::Error> for ExportError {
    fn from(e: serde_json::Error) -> Self {
        ExportError::Serialize(e.to_string())
    }
}

impl From<csv::Error> for ExportError {
    fn from(e: csv::Error) -> Self {
        ExportError::Serialize(e.to_string())
    }
}

/// A specialized Result type for the table exporter.
pub type Result<T> = std::result::Result<T, ExportError>;
