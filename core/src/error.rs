//! Error types and handling for filewise core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for filewise operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for filewise core
#[derive(Error, Debug)]
pub enum Error {
    /// Pattern compilation errors
    #[error("Pattern error: {0}")]
    Pattern(#[from] PatternError),

    /// Tree search errors
    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    /// Rename planning and execution errors
    #[error("Rename error: {0}")]
    Rename(#[from] RenameError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A pattern that cannot be compiled for the requested match mode
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("Invalid pattern: pattern must not be empty")]
    Empty,

    #[error("Invalid pattern '{pattern}': both-anchored patterns need two non-empty anchors around '*'")]
    InvalidAnchors { pattern: String },

    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidWord { pattern: String, message: String },

    #[error("Unknown match mode '{name}' (expected exact, prefix, suffix, both or word)")]
    UnknownMode { name: String },
}

/// Tree search errors
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Path not found or not a directory: {}", path.display())]
    PathNotFound { path: PathBuf },

    #[error("Search cancelled after {examined} entries")]
    Cancelled { examined: usize },

    #[error("Failed to walk {}: {message}", path.display())]
    Walk { path: PathBuf, message: String },
}

/// Rename planning and execution errors
#[derive(Error, Debug)]
pub enum RenameError {
    #[error("Could not find a free name for {} after {attempts} attempts", target.display())]
    UnresolvableConflict { target: PathBuf, attempts: usize },

    #[error("Target {} already exists and is not part of the batch (renaming {})", target.display(), path.display())]
    ExternalCollision { path: PathBuf, target: PathBuf },

    #[error("Source listed more than once: {}", path.display())]
    DuplicateSource { path: PathBuf },

    #[error("Rename {} -> {} failed after {completed} completed operations: {message}", from.display(), to.display())]
    ExecutionFailed {
        from: PathBuf,
        to: PathBuf,
        completed: usize,
        message: String,
    },
}
