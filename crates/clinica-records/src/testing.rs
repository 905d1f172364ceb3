//! Test fixtures shared by the repository and service tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use clinica_core::{NewConsulta, NewProntuario};
use clinica_storage::{
    CollectionSpec, DeleteResult, Document, DocumentStore, DynDocumentStore, StorageResult,
    UpdateResult, document_id,
};
use serde_json::{Value, json};

pub(crate) fn store() -> DynDocumentStore {
    clinica_db_memory::create_document_store()
}

pub(crate) fn new_consulta(reason: &str) -> NewConsulta {
    serde_json::from_value(json!({
        "scheduledAt": "2025-07-25T10:00:00",
        "reason": reason,
        "doctorId": 101,
        "patientId": 201,
        "status": "Scheduled",
    }))
    .unwrap()
}

pub(crate) fn new_prontuario(id: i64) -> NewProntuario {
    serde_json::from_value(json!({
        "id": id,
        "createdAt": "2025-06-01T08:00:00",
        "medicalHistory": "No known allergies",
        "diagnosis": "Seasonal flu",
        "patientId": 201,
        "treatment": "Rest and fluids",
    }))
    .unwrap()
}

/// Store wrapper where a rival writer wins the next `races` inserts.
///
/// Before forwarding an insert, the wrapper saves a copy of the document
/// itself, so the forwarded insert hits the unique index exactly as it would
/// when a concurrent request took the same identifier first.
pub(crate) struct RacingStore {
    inner: DynDocumentStore,
    races: AtomicUsize,
}

impl RacingStore {
    pub(crate) fn new(races: usize) -> Arc<Self> {
        Arc::new(Self {
            inner: store(),
            races: AtomicUsize::new(races),
        })
    }

    fn take_race(&self) -> bool {
        self.races
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl DocumentStore for RacingStore {
    async fn find_one(
        &self,
        collection: &CollectionSpec,
        field: &str,
        value: &Value,
    ) -> StorageResult<Option<Document>> {
        self.inner.find_one(collection, field, value).await
    }

    async fn find_all(&self, collection: &CollectionSpec) -> StorageResult<Vec<Document>> {
        self.inner.find_all(collection).await
    }

    async fn save(
        &self,
        collection: &CollectionSpec,
        document: Document,
    ) -> StorageResult<Document> {
        if document_id(&document).is_none() && self.take_race() {
            self.inner.save(collection, document.clone()).await?;
        }
        self.inner.save(collection, document).await
    }

    async fn update_one(
        &self,
        collection: &CollectionSpec,
        field: &str,
        value: &Value,
        changes: Document,
    ) -> StorageResult<UpdateResult> {
        self.inner.update_one(collection, field, value, changes).await
    }

    async fn delete_one(
        &self,
        collection: &CollectionSpec,
        field: &str,
        value: &Value,
    ) -> StorageResult<DeleteResult> {
        self.inner.delete_one(collection, field, value).await
    }

    fn backend_name(&self) -> &'static str {
        "racing"
    }
}
