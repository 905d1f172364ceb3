//! JSON object <-> BSON document conversion.

use clinica_storage::Document;
use mongodb::bson::{self, Bson, Document as BsonDocument};
use serde_json::Value;

use crate::error::MongoError;

pub(crate) fn to_bson_document(document: &Document) -> Result<BsonDocument, MongoError> {
    bson::to_document(document).map_err(|e| MongoError::conversion(e.to_string()))
}

pub(crate) fn to_bson_value(value: &Value) -> Result<Bson, MongoError> {
    bson::to_bson(value).map_err(|e| MongoError::conversion(e.to_string()))
}

pub(crate) fn from_bson_document(document: BsonDocument) -> Result<Document, MongoError> {
    match Bson::Document(document).into_relaxed_extjson() {
        Value::Object(map) => Ok(map),
        other => Err(MongoError::conversion(format!(
            "expected an object, got {other}"
        ))),
    }
}

/// Builds `{ field: value }`.
pub(crate) fn filter(field: &str, value: &Value) -> Result<BsonDocument, MongoError> {
    let mut filter = BsonDocument::new();
    filter.insert(field, to_bson_value(value)?);
    Ok(filter)
}
