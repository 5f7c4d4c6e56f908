//! Error types for the markup crate

use thiserror::Error;

/// Errors that can occur while serializing markup
#[derive(Error, Debug)]
pub enum MarkupError {
    /// XML writer error
    #[error("XML write error: {0}")]
    Xml(String),

    /// Serialized output was not valid UTF-8
    #[error("Output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for markup operations
pub type MarkupResult<T> = Result<T, MarkupError>;
