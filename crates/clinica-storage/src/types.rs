//! Core types for the document store abstraction layer.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A stored document: a JSON object keyed by field name.
pub type Document = Map<String, Value>;

/// Field holding the backend-assigned document id.
///
/// A document without this field is new; `save` inserts it and assigns one.
/// A document carrying it replaces the stored document with the same id.
pub const DOCUMENT_ID_FIELD: &str = "_id";

/// Describes a collection and the field carrying its unique index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollectionSpec {
    /// Collection name in the backend.
    pub name: &'static str,
    /// Field with a unique index; every document must carry it.
    pub key_field: &'static str,
}

impl CollectionSpec {
    /// Creates a collection spec.
    #[must_use]
    pub const fn new(name: &'static str, key_field: &'static str) -> Self {
        Self { name, key_field }
    }
}

/// Outcome of an update-by-field operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateResult {
    /// Number of documents matching the filter (0 or 1).
    pub matched_count: u64,
    /// Number of documents whose content actually changed (0 or 1).
    pub modified_count: u64,
}

impl UpdateResult {
    /// No document matched.
    #[must_use]
    pub const fn unmatched() -> Self {
        Self {
            matched_count: 0,
            modified_count: 0,
        }
    }

    /// One document matched; `modified` tells whether its content changed.
    #[must_use]
    pub const fn matched(modified: bool) -> Self {
        Self {
            matched_count: 1,
            modified_count: if modified { 1 } else { 0 },
        }
    }
}

/// Outcome of a delete-by-field operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResult {
    /// Number of documents removed (0 or 1).
    pub deleted_count: u64,
}

/// Returns the backend-assigned id of a document, if it has one.
#[must_use]
pub fn document_id(document: &Document) -> Option<&str> {
    document.get(DOCUMENT_ID_FIELD).and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_id() {
        let mut doc = Document::new();
        assert_eq!(document_id(&doc), None);

        doc.insert(DOCUMENT_ID_FIELD.into(), json!("abc"));
        assert_eq!(document_id(&doc), Some("abc"));

        doc.insert(DOCUMENT_ID_FIELD.into(), json!(17));
        assert_eq!(document_id(&doc), None);
    }

    #[test]
    fn test_update_result_constructors() {
        assert_eq!(UpdateResult::unmatched().matched_count, 0);
        assert_eq!(UpdateResult::matched(true).modified_count, 1);
        assert_eq!(UpdateResult::matched(false).modified_count, 0);
        assert_eq!(UpdateResult::matched(false).matched_count, 1);
    }
}
