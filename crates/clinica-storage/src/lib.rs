//! # clinica-storage
//!
//! Document store abstraction layer for the Clinica server.
//!
//! This crate defines the trait and types that all document store backends
//! must implement. It does not contain any implementations - those are
//! provided by `clinica-db-memory` and `clinica-db-mongo`.
//!
//! ## Overview
//!
//! The main trait is [`DocumentStore`], which defines the contract for:
//! - find-one-by-field and find-all
//! - save (insert-or-replace)
//! - update-by-field with a partial document
//! - delete-by-field
//!
//! Every collection is described by a [`CollectionSpec`] naming the field that
//! carries the collection's unique index.
//!
//! ## Example
//!
//! ```ignore
//! use clinica_storage::{CollectionSpec, DocumentStore, StorageError};
//!
//! const PATIENTS: CollectionSpec = CollectionSpec::new("patients", "id");
//!
//! async fn load_patient(
//!     store: &dyn DocumentStore,
//!     id: i64,
//! ) -> Result<Option<Document>, StorageError> {
//!     store.find_one(&PATIENTS, "id", &serde_json::json!(id)).await
//! }
//! ```

mod error;
mod traits;
mod types;

pub use error::{ErrorCategory, StorageError};
pub use traits::DocumentStore;
pub use types::{
    CollectionSpec, DOCUMENT_ID_FIELD, DeleteResult, Document, UpdateResult, document_id,
};

/// Type alias for a storage result.
pub type StorageResult<T> = Result<T, StorageError>;

/// Type alias for a shareable document store trait object.
pub type DynDocumentStore = std::sync::Arc<dyn DocumentStore>;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use clinica_storage::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{ErrorCategory, StorageError};
    pub use crate::traits::DocumentStore;
    pub use crate::types::{
        CollectionSpec, DOCUMENT_ID_FIELD, DeleteResult, Document, UpdateResult, document_id,
    };
    pub use crate::{DynDocumentStore, StorageResult};
}
