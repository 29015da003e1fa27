//! Custom error types for the common library
//!
//! This module defines the error type returned by every record store
//! operation, whichever backend is in use.

use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

/// Custom error type for record store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing file could not be read, written or renamed
    #[error("Storage I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing file does not contain a valid collection
    #[error("Corrupt collection file {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The backing file was written with an incompatible schema version
    #[error("Unsupported schema version {found} in {path} (expected {expected})")]
    UnsupportedVersion {
        path: PathBuf,
        found: u32,
        expected: u32,
    },

    /// The backing file holds a different kind of record
    #[error("Collection file {path} holds '{found}' records, expected '{expected}'")]
    KindMismatch {
        path: PathBuf,
        found: String,
        expected: &'static str,
    },

    /// The collection could not be serialized
    #[error("Serialization error: {0}")]
    Serialize(#[source] serde_json::Error),

    /// No record carries the requested identifier
    #[error("No {kind} with id {id}")]
    NotFound { kind: &'static str, id: Uuid },

    /// The record clashes with one already stored
    #[error("Conflicting {kind}: {message}")]
    Conflict { kind: &'static str, message: String },
}

impl StoreError {
    /// Whether this error means the requested record does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    /// Whether this error means the record clashes with an existing one
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict { .. })
    }
}

/// Type alias for Result with StoreError
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let not_found = StoreError::NotFound {
            kind: "user",
            id: Uuid::nil(),
        };
        assert!(not_found.is_not_found());
        assert!(!not_found.is_conflict());

        let conflict = StoreError::Conflict {
            kind: "user",
            message: "email already registered".to_string(),
        };
        assert!(conflict.is_conflict());
        assert_eq!(
            conflict.to_string(),
            "Conflicting user: email already registered"
        );
    }
}
