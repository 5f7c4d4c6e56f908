//! Error types for the graph crate

use svg_markup::MarkupError;
use thiserror::Error;

/// Errors that can occur when configuring or rendering a graph
#[derive(Error, Debug)]
pub enum ChartError {
    /// Option value or color policy that cannot be rendered
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Markup serialization error
    #[error("Markup error: {0}")]
    Markup(#[from] MarkupError),
}

impl From<serde_json::Error> for ChartError {
    fn from(err: serde_json::Error) -> Self {
        ChartError::InvalidConfiguration(err.to_string())
    }
}

/// Result type for graph operations
pub type ChartResult<T> = Result<T, ChartError>;
