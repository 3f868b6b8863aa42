//! Error types for catalog extraction and reporting.
//!
//! This module provides the [`ShelflinkError`] type for all library operations
//! and the [`Result`] convenience type.
//!
//! Call-number and URL parsing never fail: malformed text degrades to sentinel
//! or empty values instead. Errors only come from the document stream itself,
//! from records missing their identifier, and from I/O around them.

use thiserror::Error;

/// Error type for all library operations.
#[derive(Error, Debug)]
pub enum ShelflinkError {
    /// A record lacks a field required for its identity (controlfield 001).
    #[error("Record {position} is missing required field {field}")]
    MissingRequiredField {
        /// The missing field, e.g. `controlfield 001`.
        field: String,
        /// 1-based position of the record in the document.
        position: usize,
    },

    /// The document is not well-formed in a way the XML reader detected.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// The document is structurally broken in a way found by the extractor
    /// (for example it ends inside an open `<record>`).
    #[error("Malformed document: {0}")]
    MalformedStream(String),

    /// Invalid configuration value or configuration file.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON serialization or deserialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error from the underlying source/destination.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Convenience type alias for [`std::result::Result`] with [`ShelflinkError`].
pub type Result<T> = std::result::Result<T, ShelflinkError>;
