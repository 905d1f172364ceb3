//! In-memory document store backend for the Clinica server.
//!
//! This crate provides an in-memory implementation of the `DocumentStore`
//! trait from `clinica-storage`, using papaya lock-free HashMap for concurrent
//! access. Each collection is indexed by its key field, so the unique index
//! check and the insert happen as one atomic map operation.
//!
//! # Example
//!
//! ```ignore
//! use clinica_db_memory::InMemoryDocumentStore;
//! use clinica_storage::{CollectionSpec, DocumentStore};
//!
//! const NOTES: CollectionSpec = CollectionSpec::new("notes", "id");
//!
//! let store = InMemoryDocumentStore::new();
//! let doc = serde_json::json!({"id": 1, "text": "hello"});
//! store.save(&NOTES, doc.as_object().unwrap().clone()).await?;
//! ```

mod store_impl;
pub mod storage;

// Re-export the DocumentStore trait for convenience
pub use clinica_storage::{DocumentStore, StorageError};

pub use storage::InMemoryDocumentStore;

/// Creates a new in-memory DocumentStore instance.
pub fn create_document_store() -> clinica_storage::DynDocumentStore {
    std::sync::Arc::new(InMemoryDocumentStore::new())
}
