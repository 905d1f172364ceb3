//! Store construction from configuration.

use std::sync::Arc;

use clinica_storage::DynDocumentStore;

use crate::config::{StorageBackend, StorageSettings};

/// Builds the document store selected by `settings`.
pub async fn create_store(settings: &StorageSettings) -> anyhow::Result<DynDocumentStore> {
    let store: DynDocumentStore = match settings.backend {
        StorageBackend::Memory => Arc::new(clinica_db_memory::InMemoryDocumentStore::new()),
        StorageBackend::Mongodb => connect_mongodb(settings).await?,
    };
    tracing::info!(backend = store.backend_name(), "document store ready");
    Ok(store)
}

#[cfg(feature = "mongodb")]
async fn connect_mongodb(settings: &StorageSettings) -> anyhow::Result<DynDocumentStore> {
    use clinica_db_mongo::{MongoConfig, MongoDocumentStore};

    let mongo = settings.mongodb.clone().unwrap_or_default();
    let config = MongoConfig::new(mongo.uri).with_database(mongo.database);
    let store = MongoDocumentStore::connect(&config).await?;
    store.ensure_indexes(&clinica_records::COLLECTIONS).await?;
    Ok(Arc::new(store))
}

#[cfg(not(feature = "mongodb"))]
async fn connect_mongodb(_settings: &StorageSettings) -> anyhow::Result<DynDocumentStore> {
    anyhow::bail!("the mongodb backend is not compiled in; rebuild with `--features mongodb`")
}
