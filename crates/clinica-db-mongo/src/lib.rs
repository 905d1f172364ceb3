//! MongoDB document store backend for the Clinica server.
//!
//! Implements the `DocumentStore` trait from `clinica-storage` on top of the
//! official async driver. Documents cross the boundary as JSON objects and are
//! converted to and from BSON at the edge of each operation.
//!
//! Call [`MongoDocumentStore::ensure_indexes`] once at startup so that each
//! collection's key field carries a unique index; duplicate inserts are then
//! reported as [`clinica_storage::StorageError::DuplicateKey`].

pub mod config;
mod convert;
pub mod error;
mod storage;

pub use config::MongoConfig;
pub use error::{DUPLICATE_KEY_CODE, MongoError, is_duplicate_key};
pub use storage::MongoDocumentStore;
