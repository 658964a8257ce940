//! Repository error types

use thiserror::Error;

/// Repository errors
#[derive(Debug, Error)]
pub enum RepoError {
    /// Collection is not configured
    #[error("Unknown collection: {0}")]
    UnknownCollection(String),

    /// No item with this id
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// No group with this id
    #[error("Group not found: {0}")]
    GroupNotFound(String),

    /// Group id cannot be mapped to a folder (empty segment, `..`, reserved)
    #[error("Invalid group id: {0}")]
    InvalidGroup(String),

    /// Destination already exists
    #[error("Already exists: {0}")]
    Conflict(String),

    /// Operation is not available in this repository
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// Represents an I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
