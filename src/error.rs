//! Error types for the collection pipeline.

use thiserror::Error;

/// Result type for collection operations.
pub type CollectResult<T> = Result<T, CollectError>;

/// Errors that can occur between capture and export.
#[derive(Debug, Error)]
pub enum CollectError {
    /// Malformed sample rejected before any store mutation.
    #[error("Invalid sample: {0}")]
    Validation(String),

    /// Submission attempted with no ink on the canvas.
    #[error("Canvas is empty, draw something first")]
    EmptyCanvas,

    /// The underlying store failed; nothing was persisted.
    #[error("Store failure: {0}")]
    Persistence(String),

    /// Serialization or output-channel failure during export.
    #[error("Export failure: {0}")]
    Export(String),
}
