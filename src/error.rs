//! Error types for the export pipeline.
//!
//! Malformed note content never produces an error: unmatched fences and
//! ragged tables degrade to plain text. Errors are reserved for failures of
//! the drawing surface and of serialization, which abort the whole export.

/// Result type alias for export operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while rendering or writing a document.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Font is not one of the registered Base-14 fonts
    #[error("Font error: {0}")]
    Font(String),

    /// Geometry that cannot be placed on a page
    #[error("Layout error: {0}")]
    Layout(String),

    /// Note input could not be decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
