//! Error types for the analysis pipeline.

use thiserror::Error;

/// Errors produced by the crop frequency analysis pipeline.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The request payload could not be reduced to a polygonal AOI.
    /// Surfaces to callers as a bad-request condition.
    #[error("invalid AOI: {0}")]
    InvalidAoi(String),

    #[error("projection from {from} to {to} failed: {reason}")]
    Projection {
        from: String,
        to: String,
        reason: String,
    },

    #[error("dataset '{0}' not found")]
    DatasetNotFound(String),

    #[error("dataset has no resolvable CRS")]
    MissingCrs,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("core error: {0}")]
    Core(#[from] cropfreq_core::Error),
}

/// Result alias for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;
