use async_trait::async_trait;
use clinica_storage::{
    CollectionSpec, DOCUMENT_ID_FIELD, DeleteResult, Document, DocumentStore, StorageError,
    StorageResult, UpdateResult, document_id,
};
use futures_util::TryStreamExt;
use mongodb::bson::{Document as BsonDocument, doc};
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Collection, Database, IndexModel};
use serde_json::Value;
use std::time::Duration;
use uuid::Uuid;

use crate::config::MongoConfig;
use crate::convert::{filter, from_bson_document, to_bson_document};
use crate::error::{MongoError, is_duplicate_key};

/// MongoDB-backed document store.
#[derive(Debug, Clone)]
pub struct MongoDocumentStore {
    database: Database,
}

impl MongoDocumentStore {
    /// Connects to the server described by `config`.
    ///
    /// The driver connects lazily; a bad host surfaces on the first operation
    /// as a connection error.
    pub async fn connect(config: &MongoConfig) -> Result<Self, MongoError> {
        if config.database.trim().is_empty() {
            return Err(MongoError::config("database name must not be empty"));
        }
        let mut options = ClientOptions::parse(&config.uri).await?;
        let timeout = Duration::from_millis(config.connect_timeout_ms);
        options.connect_timeout = Some(timeout);
        options.server_selection_timeout = Some(timeout);
        options.app_name = config.app_name.clone();

        let client = Client::with_options(options)?;
        tracing::info!(database = %config.database, "MongoDB client configured");
        Ok(Self {
            database: client.database(&config.database),
        })
    }

    /// Creates a unique ascending index on each collection's key field.
    pub async fn ensure_indexes(&self, collections: &[CollectionSpec]) -> StorageResult<()> {
        for spec in collections {
            let mut keys = BsonDocument::new();
            keys.insert(spec.key_field, 1);
            let index = IndexModel::builder()
                .keys(keys)
                .options(IndexOptions::builder().unique(true).build())
                .build();
            self.collection(spec)
                .create_index(index)
                .await
                .map_err(MongoError::from)?;
            tracing::debug!(
                collection = spec.name,
                key = spec.key_field,
                "unique index ensured"
            );
        }
        Ok(())
    }

    fn collection(&self, spec: &CollectionSpec) -> Collection<BsonDocument> {
        self.database.collection(spec.name)
    }
}

#[async_trait]
impl DocumentStore for MongoDocumentStore {
    async fn find_one(
        &self,
        collection: &CollectionSpec,
        field: &str,
        value: &Value,
    ) -> StorageResult<Option<Document>> {
        let found = self
            .collection(collection)
            .find_one(filter(field, value)?)
            .await
            .map_err(MongoError::from)?;
        Ok(found.map(from_bson_document).transpose()?)
    }

    async fn find_all(&self, collection: &CollectionSpec) -> StorageResult<Vec<Document>> {
        let mut sort = BsonDocument::new();
        sort.insert(collection.key_field, 1);
        let documents: Vec<BsonDocument> = self
            .collection(collection)
            .find(BsonDocument::new())
            .sort(sort)
            .await
            .map_err(MongoError::from)?
            .try_collect()
            .await
            .map_err(MongoError::from)?;

        documents
            .into_iter()
            .map(|d| from_bson_document(d).map_err(StorageError::from))
            .collect()
    }

    async fn save(
        &self,
        collection: &CollectionSpec,
        mut document: Document,
    ) -> StorageResult<Document> {
        let target = self.collection(collection);

        match document_id(&document).map(str::to_owned) {
            None => {
                document.insert(
                    DOCUMENT_ID_FIELD.to_string(),
                    Value::String(Uuid::new_v4().to_string()),
                );
                let key = document
                    .get(collection.key_field)
                    .map(Value::to_string)
                    .unwrap_or_default();
                if let Err(err) = target.insert_one(to_bson_document(&document)?).await {
                    if is_duplicate_key(&err) {
                        return Err(StorageError::duplicate_key(collection.name, key));
                    }
                    return Err(MongoError::from(err).into());
                }
            }
            Some(id) => {
                let key = document
                    .get(collection.key_field)
                    .map(Value::to_string)
                    .unwrap_or_default();
                let result = target
                    .replace_one(
                        filter(DOCUMENT_ID_FIELD, &Value::String(id))?,
                        to_bson_document(&document)?,
                    )
                    .upsert(true)
                    .await;
                if let Err(err) = result {
                    if is_duplicate_key(&err) {
                        return Err(StorageError::duplicate_key(collection.name, key));
                    }
                    return Err(MongoError::from(err).into());
                }
            }
        }

        Ok(document)
    }

    async fn update_one(
        &self,
        collection: &CollectionSpec,
        field: &str,
        value: &Value,
        mut changes: Document,
    ) -> StorageResult<UpdateResult> {
        changes.remove(DOCUMENT_ID_FIELD);
        if changes.is_empty() {
            let exists = self.find_one(collection, field, value).await?.is_some();
            return Ok(if exists {
                UpdateResult::matched(false)
            } else {
                UpdateResult::unmatched()
            });
        }

        // A unique index violation can only come from a new key field value.
        let collided = changes
            .get(collection.key_field)
            .unwrap_or(value)
            .to_string();
        let update = doc! { "$set": to_bson_document(&changes)? };
        let result = self
            .collection(collection)
            .update_one(filter(field, value)?, update)
            .await
            .map_err(|err| {
                if is_duplicate_key(&err) {
                    StorageError::duplicate_key(collection.name, collided)
                } else {
                    MongoError::from(err).into()
                }
            })?;

        Ok(UpdateResult {
            matched_count: result.matched_count,
            modified_count: result.modified_count,
        })
    }

    async fn delete_one(
        &self,
        collection: &CollectionSpec,
        field: &str,
        value: &Value,
    ) -> StorageResult<DeleteResult> {
        let result = self
            .collection(collection)
            .delete_one(filter(field, value)?)
            .await
            .map_err(MongoError::from)?;
        Ok(DeleteResult {
            deleted_count: result.deleted_count,
        })
    }

    fn backend_name(&self) -> &'static str {
        "mongodb"
    }
}
