//! Storage traits for the document store abstraction layer.

use async_trait::async_trait;
use serde_json::Value;

use crate::StorageResult;
use crate::types::{CollectionSpec, DeleteResult, Document, UpdateResult};

/// The trait every document store backend implements.
///
/// Operations address documents by the value of a single top-level field.
/// Implementations must be thread-safe (`Send + Sync`) and must not retry:
/// connectivity and duplicate-key failures are returned to the caller as
/// [`StorageError`](crate::StorageError) values.
///
/// # Example
///
/// ```ignore
/// use clinica_storage::{DocumentStore, StorageError};
///
/// async fn count(store: &dyn DocumentStore, spec: &CollectionSpec) -> Result<usize, StorageError> {
///     Ok(store.find_all(spec).await?.len())
/// }
/// ```
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns the first document whose `field` equals `value`.
    ///
    /// Returns `None` when nothing matches; errors only for backend failures.
    async fn find_one(
        &self,
        collection: &CollectionSpec,
        field: &str,
        value: &Value,
    ) -> StorageResult<Option<Document>>;

    /// Returns every document in the collection, in the backend's natural order.
    async fn find_all(&self, collection: &CollectionSpec) -> StorageResult<Vec<Document>>;

    /// Inserts or replaces a document.
    ///
    /// A document without `_id` is inserted and gets a fresh id. A document
    /// with `_id` replaces the stored document with that id, or is inserted
    /// under it when none exists. The saved document is returned.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::DuplicateKey` if the key field value is held by
    /// another document. Returns `StorageError::InvalidDocument` if the
    /// document lacks the collection's key field.
    async fn save(&self, collection: &CollectionSpec, document: Document)
    -> StorageResult<Document>;

    /// Sets the top-level fields in `changes` on the first document whose
    /// `field` equals `value`. Fields absent from `changes` are left untouched.
    async fn update_one(
        &self,
        collection: &CollectionSpec,
        field: &str,
        value: &Value,
        changes: Document,
    ) -> StorageResult<UpdateResult>;

    /// Deletes the first document whose `field` equals `value`.
    async fn delete_one(
        &self,
        collection: &CollectionSpec,
        field: &str,
        value: &Value,
    ) -> StorageResult<DeleteResult>;

    /// Returns the name of this storage backend for logging/debugging.
    fn backend_name(&self) -> &'static str;
}
