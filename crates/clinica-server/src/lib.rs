pub mod config;
pub mod error;
pub mod handlers;
pub mod observability;
pub mod server;
pub mod storage;

pub use config::{AppConfig, LoggingConfig, MongoSettings, ServerConfig, StorageBackend, StorageSettings};
pub use error::ApiError;
pub use observability::init_tracing;
pub use server::{AppState, ClinicaServer, ServerBuilder, build_app};
pub use storage::create_store;
