//! Top-level error type.

use tenq_data::DataError;
use tenq_output::ExportError;
use thiserror::Error;

/// Result type for `tenq` operations.
pub type Result<T> = std::result::Result<T, TenqError>;

/// Errors surfaced by the pipeline, configuration and summarization layers.
#[derive(Debug, Error)]
pub enum TenqError {
    /// Archive access, parsing or slicing failed
    #[error(transparent)]
    Data(#[from] DataError),

    /// Writing an export failed
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The summarization endpoint rejected the request
    #[error("Summarization failed with HTTP {status}: {body}")]
    Summary {
        /// HTTP status returned
        status: u16,
        /// Response body, truncated
        body: String,
    },

    /// Network or decoding error talking to the summarization endpoint
    #[error("Summarization request failed: {0}")]
    Network(#[from] reqwest::Error),
}
