//! Error types for catalog discovery.

use thiserror::Error;

use crate::session::SessionError;

/// Main error type for catalog operations.
///
/// Per-candidate probe failures never surface through this type: they are
/// logged and the candidate is excluded from the catalog. Only failures that
/// make the whole discovery pass meaningless (the session cannot be opened,
/// the pass was cancelled) propagate.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Configuration error (invalid JSON, missing fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The discovery session could not be opened at all.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Discovery was cancelled between candidates.
    #[error("Discovery cancelled")]
    Cancelled,

    /// IO error (configuration file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
