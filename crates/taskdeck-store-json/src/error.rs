//! Error types for taskdeck store operations.

use thiserror::Error;

/// Errors that can occur during `JsonStore` operations.
#[derive(Error, Debug)]
pub enum JsonStoreError {
    /// Failed to parse or serialize the backing document.
    #[error("Task document JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
