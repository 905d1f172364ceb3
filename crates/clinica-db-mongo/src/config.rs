//! Configuration types for the MongoDB storage backend.

use serde::{Deserialize, Serialize};

/// Configuration for the MongoDB storage backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MongoConfig {
    /// Connection string: `mongodb://host:port`
    pub uri: String,

    /// Database holding the collections.
    pub database: String,

    /// Server selection and connect timeout in milliseconds.
    pub connect_timeout_ms: u64,

    /// Application name reported to the server.
    pub app_name: Option<String>,
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            uri: "mongodb://localhost:27017".into(),
            database: "medical_db".into(),
            connect_timeout_ms: 5000,
            app_name: Some("clinica".into()),
        }
    }
}

impl MongoConfig {
    /// Creates a new configuration with the given connection string.
    #[must_use]
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            ..Default::default()
        }
    }

    /// Sets the database name.
    #[must_use]
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Sets the connect timeout.
    #[must_use]
    pub fn with_connect_timeout_ms(mut self, timeout: u64) -> Self {
        self.connect_timeout_ms = timeout;
        self
    }

    /// Sets the application name.
    #[must_use]
    pub fn with_app_name(mut self, name: Option<String>) -> Self {
        self.app_name = name;
        self
    }
}
