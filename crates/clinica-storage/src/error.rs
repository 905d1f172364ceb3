//! Storage error types for the document store abstraction layer.
//!
//! Backends translate their native failures into [`StorageError`] and hand
//! them to the caller unchanged; nothing at this layer retries.

use std::fmt;

/// Errors that can occur during document store operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A write collided with the unique index of a collection.
    #[error("Duplicate key in {collection}: {key}")]
    DuplicateKey {
        /// The collection holding the unique index.
        collection: String,
        /// The rendered value of the colliding key.
        key: String,
    },

    /// A document could not be encoded, decoded or lacked a required field.
    #[error("Invalid document: {message}")]
    InvalidDocument {
        /// Description of why the document is invalid.
        message: String,
    },

    /// Failed to reach the storage backend.
    #[error("Connection error: {message}")]
    Connection {
        /// Description of the connection error.
        message: String,
    },

    /// An internal storage error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl StorageError {
    /// Creates a new `DuplicateKey` error.
    #[must_use]
    pub fn duplicate_key(collection: impl Into<String>, key: impl Into<String>) -> Self {
        Self::DuplicateKey {
            collection: collection.into(),
            key: key.into(),
        }
    }

    /// Creates a new `InvalidDocument` error.
    #[must_use]
    pub fn invalid_document(message: impl Into<String>) -> Self {
        Self::InvalidDocument {
            message: message.into(),
        }
    }

    /// Creates a new `Connection` error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` if this is a unique index violation.
    #[must_use]
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, Self::DuplicateKey { .. })
    }

    /// Returns `true` if the backend could not be reached.
    #[must_use]
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }

    /// Returns the error category for logging/monitoring purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::DuplicateKey { .. } => ErrorCategory::Conflict,
            Self::InvalidDocument { .. } => ErrorCategory::Validation,
            Self::Connection { .. } => ErrorCategory::Infrastructure,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::invalid_document(err.to_string())
    }
}

/// Categories of storage errors for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Unique index violation.
    Conflict,
    /// Malformed document.
    Validation,
    /// Infrastructure/connection error.
    Infrastructure,
    /// Internal error.
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conflict => write!(f, "conflict"),
            Self::Validation => write!(f, "validation"),
            Self::Infrastructure => write!(f, "infrastructure"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StorageError::duplicate_key("consultas", "3");
        assert_eq!(err.to_string(), "Duplicate key in consultas: 3");

        let err = StorageError::connection("server selection timed out");
        assert_eq!(err.to_string(), "Connection error: server selection timed out");

        let err = StorageError::invalid_document("missing field `id`");
        assert_eq!(err.to_string(), "Invalid document: missing field `id`");
    }

    #[test]
    fn test_error_predicates() {
        let err = StorageError::duplicate_key("consultas", "1");
        assert!(err.is_duplicate_key());
        assert!(!err.is_connection());

        let err = StorageError::connection("refused");
        assert!(!err.is_duplicate_key());
        assert!(err.is_connection());
    }

    #[test]
    fn test_error_category() {
        assert_eq!(
            StorageError::duplicate_key("prontuarios", "5").category(),
            ErrorCategory::Conflict
        );
        assert_eq!(
            StorageError::invalid_document("bad").category(),
            ErrorCategory::Validation
        );
        assert_eq!(
            StorageError::connection("down").category(),
            ErrorCategory::Infrastructure
        );
        assert_eq!(ErrorCategory::Infrastructure.to_string(), "infrastructure");
    }

    #[test]
    fn test_from_serde_json_error() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let storage: StorageError = err.into();
        assert!(matches!(storage, StorageError::InvalidDocument { .. }));
    }
}
