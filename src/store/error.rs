//! Persistence error types
//!
//! Errors raised by [`KvStore`](super::KvStore) backends. Ledgers log and
//! swallow these; they only surface to callers that use a store directly.

use thiserror::Error;

/// Key-value store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Represents a sled database error
    #[error("Database error: {0}")]
    SledError(#[from] sled::Error),

    /// Stored bytes could not be decoded or a value could not be encoded
    #[error("Error during serialization: {0}")]
    SerializeError(#[from] serde_json::Error),

    /// Stored key is not valid UTF-8
    #[error("Invalid key in {namespace}: {message}")]
    InvalidKey {
        namespace: &'static str,
        message: String,
    },

    /// Backend could not be read
    #[error("Read failed: {0}")]
    ReadFailed(String),

    /// Backend refused the write
    #[error("Write rejected: {0}")]
    WriteRejected(String),
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
