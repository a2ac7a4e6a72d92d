use std::path::PathBuf;

use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

/// Error types for tree, command and configuration operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// I/O errors from filesystem operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid path provided by the user.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// A directory could not be listed while expanding it.
    #[error("Failed to expand {}: {source}", path.display())]
    Expand {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Unrecognized sort criteria name.
    #[error("Unknown sort criteria: {0}")]
    InvalidSortCriteria(String),

    /// Undo requested for a command that never captured state.
    #[error("Nothing to undo for {0}")]
    NothingToUndo(String),

    /// Configuration could not be read or parsed.
    #[error("Config error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
