//! Error types for the uploads organizer.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the uploads organizer.
#[derive(Error, Debug)]
pub enum Error {
    // File system errors
    #[error("Path not found: {0}")]
    PathNotFound(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    // Move errors
    #[error("Source file missing: {0}")]
    SourceMissing(String),

    #[error("Destination conflict: a different file already exists at {0}")]
    DestinationConflict(String),

    // Resolver errors
    #[error("Cannot resolve target path: {0}")]
    UnresolvedPath(String),

    // Store errors
    #[error("Post not found: {0}")]
    PostNotFound(u64),

    #[error("Attachment not found: {0}")]
    AttachmentNotFound(u64),

    #[error("Invalid library file: {0}")]
    InvalidLibraryFile(String),

    // Settings errors
    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Generic errors
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a generic error from a string.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }
}
