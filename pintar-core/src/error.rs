//! Error types and result types for storage operations.
//!
//! Storage failures are reported as [`StorageError`]; use [`StorageResult<T>`] as the
//! return type for fallible data-access operations. Input validation failures live in
//! [`crate::validate::ValidationError`] and never reach the store.

use bson::error::Error as BsonError;
use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// Represents all possible errors that can occur when talking to a document store.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Serialization/deserialization error when converting between document formats (BSON, JSON).
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// Error during store initialization or connection setup.
    #[error("Initialization error: {0}")]
    Initialization(String),
    /// No store has been configured for this process.
    #[error("{0}")]
    Unavailable(String),
    /// A stored document does not satisfy the schema of the record it is read as.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
    /// An error occurred in the underlying storage backend, e.g. it is unreachable
    /// or rejected the operation.
    #[error("Backend error: {0}")]
    Backend(String),
}

impl StorageError {
    /// The underlying message, without the error kind prefix.
    pub fn message(&self) -> &str {
        match self {
            StorageError::Serialization(message)
            | StorageError::Initialization(message)
            | StorageError::Unavailable(message)
            | StorageError::InvalidDocument(message)
            | StorageError::Backend(message) => message,
        }
    }
}

/// A specialized `Result` type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

impl From<BsonError> for StorageError {
    fn from(err: BsonError) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

impl From<SerdeJsonError> for StorageError {
    fn from(err: SerdeJsonError) -> Self {
        StorageError::Serialization(err.to_string())
    }
}
