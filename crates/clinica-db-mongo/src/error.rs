//! Error types for the MongoDB storage backend.

use clinica_storage::StorageError;
use mongodb::error::{Error as DriverError, ErrorKind, WriteFailure};

/// Server error code for a unique index violation (E11000).
pub const DUPLICATE_KEY_CODE: i32 = 11000;

/// Checks if a driver error is a unique index violation.
pub fn is_duplicate_key(err: &DriverError) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write)) if write.code == DUPLICATE_KEY_CODE
    )
}

/// Errors specific to the MongoDB storage backend.
#[derive(Debug, thiserror::Error)]
pub enum MongoError {
    /// Driver or server error.
    #[error("MongoDB error: {0}")]
    Driver(#[from] DriverError),

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// BSON conversion error.
    #[error("Conversion error: {message}")]
    Conversion { message: String },
}

impl MongoError {
    /// Creates a new configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a new conversion error.
    #[must_use]
    pub fn conversion(message: impl Into<String>) -> Self {
        Self::Conversion {
            message: message.into(),
        }
    }
}

impl From<MongoError> for StorageError {
    fn from(err: MongoError) -> Self {
        match err {
            MongoError::Driver(driver) => match driver.kind.as_ref() {
                ErrorKind::Io(_) | ErrorKind::ServerSelection { .. } | ErrorKind::DnsResolve { .. } => {
                    StorageError::connection(driver.to_string())
                }
                _ => StorageError::internal(driver.to_string()),
            },
            MongoError::Config { message } => StorageError::connection(message),
            MongoError::Conversion { message } => StorageError::invalid_document(message),
        }
    }
}
