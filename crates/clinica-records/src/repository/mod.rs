//! Typed repositories over the document store.

mod consulta;
mod prontuario;

use std::marker::PhantomData;

use clinica_storage::{
    CollectionSpec, DOCUMENT_ID_FIELD, Document, DynDocumentStore, StorageError, StorageResult,
    UpdateResult, document_id,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub use consulta::{CONSULTAS, ConsultaRepository};
pub use prontuario::{PRONTUARIOS, ProntuarioRepository};

/// An entity persisted in its own collection, keyed by an integer identifier.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync {
    /// Collection holding this entity; its key field is the identifier.
    const COLLECTION: CollectionSpec;
    /// Name used in log lines and domain errors.
    const NAME: &'static str;

    fn id(&self) -> i64;
}

/// An entity together with the store's internal document id.
#[derive(Debug, Clone, PartialEq)]
pub struct Stored<T> {
    pub document_id: String,
    pub entity: T,
}

pub(crate) fn encode<T: Serialize>(value: &T) -> StorageResult<Document> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(StorageError::invalid_document(format!(
            "expected an object, got {other}"
        ))),
    }
}

pub(crate) fn decode<T: DeserializeOwned>(document: Document) -> StorageResult<T> {
    Ok(serde_json::from_value(Value::Object(document))?)
}

/// Generic repository for one entity type.
pub struct Repository<T> {
    store: DynDocumentStore,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for Repository<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("backend", &self.store.backend_name())
            .finish()
    }
}

impl<T: Entity> Repository<T> {
    pub fn new(store: DynDocumentStore) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    fn key(id: i64) -> Value {
        Value::from(id)
    }

    pub async fn find_by_id(&self, id: i64) -> StorageResult<Option<T>> {
        self.store
            .find_one(&T::COLLECTION, T::COLLECTION.key_field, &Self::key(id))
            .await?
            .map(decode)
            .transpose()
    }

    /// Like [`find_by_id`](Self::find_by_id), keeping the internal document id
    /// so the entity can be written back with [`replace`](Self::replace).
    pub async fn find_stored(&self, id: i64) -> StorageResult<Option<Stored<T>>> {
        let Some(document) = self
            .store
            .find_one(&T::COLLECTION, T::COLLECTION.key_field, &Self::key(id))
            .await?
        else {
            return Ok(None);
        };
        let document_id = document_id(&document)
            .map(str::to_owned)
            .ok_or_else(|| {
                StorageError::invalid_document(format!("{} {id} has no document id", T::NAME))
            })?;
        Ok(Some(Stored {
            document_id,
            entity: decode(document)?,
        }))
    }

    pub async fn find_all(&self) -> StorageResult<Vec<T>> {
        self.store
            .find_all(&T::COLLECTION)
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }

    /// Identifiers currently held in the collection.
    pub async fn existing_ids(&self) -> StorageResult<Vec<i64>> {
        let key_field = T::COLLECTION.key_field;
        Ok(self
            .store
            .find_all(&T::COLLECTION)
            .await?
            .iter()
            .filter_map(|doc| doc.get(key_field).and_then(Value::as_i64))
            .collect())
    }

    /// Inserts a new entity; an existing identifier yields `DuplicateKey`.
    pub async fn insert(&self, entity: &T) -> StorageResult<T> {
        tracing::debug!(entity = T::NAME, id = entity.id(), "inserting");
        let saved = self.store.save(&T::COLLECTION, encode(entity)?).await?;
        decode(saved)
    }

    /// Writes the whole entity back over its stored document.
    pub async fn replace(&self, stored: &Stored<T>) -> StorageResult<()> {
        let mut document = encode(&stored.entity)?;
        document.insert(
            DOCUMENT_ID_FIELD.to_string(),
            Value::String(stored.document_id.clone()),
        );
        self.store.save(&T::COLLECTION, document).await?;
        Ok(())
    }

    /// Sets the given top-level fields on the entity with identifier `id`.
    pub async fn update(&self, id: i64, changes: Document) -> StorageResult<UpdateResult> {
        self.store
            .update_one(
                &T::COLLECTION,
                T::COLLECTION.key_field,
                &Self::key(id),
                changes,
            )
            .await
    }

    /// Returns the number of documents removed (0 or 1).
    pub async fn delete(&self, id: i64) -> StorageResult<u64> {
        let result = self
            .store
            .delete_one(&T::COLLECTION, T::COLLECTION.key_field, &Self::key(id))
            .await?;
        Ok(result.deleted_count)
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }
}
