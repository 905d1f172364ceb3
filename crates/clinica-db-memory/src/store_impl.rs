//! `DocumentStore` trait implementation for `InMemoryDocumentStore`.

use async_trait::async_trait;
use clinica_storage::{
    CollectionSpec, DeleteResult, Document, DocumentStore, StorageResult, UpdateResult,
};
use serde_json::Value;

use crate::storage::InMemoryDocumentStore;

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn find_one(
        &self,
        collection: &CollectionSpec,
        field: &str,
        value: &Value,
    ) -> StorageResult<Option<Document>> {
        Ok(self
            .collection(collection)
            .locate(field, value)
            .map(|(_, doc)| doc))
    }

    async fn find_all(&self, collection: &CollectionSpec) -> StorageResult<Vec<Document>> {
        Ok(self.collection(collection).all())
    }

    async fn save(
        &self,
        collection: &CollectionSpec,
        document: Document,
    ) -> StorageResult<Document> {
        let saved = self.collection(collection).save(document);
        if let Err(ref err) = saved {
            tracing::debug!(
                collection = collection.name,
                category = %err.category(),
                error = %err,
                "save rejected"
            );
        }
        saved
    }

    async fn update_one(
        &self,
        collection: &CollectionSpec,
        field: &str,
        value: &Value,
        changes: Document,
    ) -> StorageResult<UpdateResult> {
        let result = self
            .collection(collection)
            .update_one(field, value, changes)?;
        tracing::debug!(
            collection = collection.name,
            field,
            matched = result.matched_count,
            modified = result.modified_count,
            "update applied"
        );
        Ok(result)
    }

    async fn delete_one(
        &self,
        collection: &CollectionSpec,
        field: &str,
        value: &Value,
    ) -> StorageResult<DeleteResult> {
        Ok(self.collection(collection).delete_one(field, value))
    }

    fn backend_name(&self) -> &'static str {
        "in-memory-papaya"
    }
}
