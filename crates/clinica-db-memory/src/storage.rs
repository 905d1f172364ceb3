use clinica_storage::{
    CollectionSpec, DOCUMENT_ID_FIELD, DeleteResult, Document, StorageError, StorageResult,
    UpdateResult, document_id,
};
use papaya::{Compute, HashMap as PapayaHashMap, Operation};
use serde_json::Value;
use std::cmp::Ordering;
use std::sync::Arc;
use uuid::Uuid;

/// Index key: the rendered JSON value of a collection's key field.
pub(crate) type IndexKey = String;

pub(crate) fn index_key(value: &Value) -> IndexKey {
    value.to_string()
}

/// Key-field ordering: numerically when both sides are integers, otherwise
/// by rendered value.
fn compare_keys(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a.and_then(Value::as_i64), b.and_then(Value::as_i64)) {
        (Some(a), Some(b)) => a.cmp(&b),
        _ => {
            let a = a.map(index_key).unwrap_or_default();
            let b = b.map(index_key).unwrap_or_default();
            a.cmp(&b)
        }
    }
}

/// Result of merging an update into the stored document, short of a plain
/// in-place write.
enum Merge {
    Unmatched,
    Unchanged,
    Invalid(StorageError),
    Move {
        new_key: IndexKey,
        updated: Document,
        expected: Document,
    },
}

/// A single collection: documents indexed by their key field value.
#[derive(Debug)]
pub(crate) struct Collection {
    name: &'static str,
    key_field: &'static str,
    documents: PapayaHashMap<IndexKey, Document>,
}

impl Collection {
    fn new(spec: &CollectionSpec) -> Self {
        Self {
            name: spec.name,
            key_field: spec.key_field,
            documents: PapayaHashMap::new(),
        }
    }

    fn key_of(&self, document: &Document) -> StorageResult<IndexKey> {
        document.get(self.key_field).map(index_key).ok_or_else(|| {
            StorageError::invalid_document(format!(
                "document for {} lacks key field `{}`",
                self.name, self.key_field
            ))
        })
    }

    /// Finds the first document whose `field` equals `value`.
    ///
    /// Lookups on the key field hit the index; any other field is a scan.
    pub(crate) fn locate(&self, field: &str, value: &Value) -> Option<(IndexKey, Document)> {
        let guard = self.documents.pin();
        if field == self.key_field {
            let key = index_key(value);
            return guard.get(&key).cloned().map(|doc| (key, doc));
        }
        guard
            .iter()
            .find(|(_, doc)| doc.get(field) == Some(value))
            .map(|(key, doc)| (key.clone(), doc.clone()))
    }

    pub(crate) fn all(&self) -> Vec<Document> {
        let guard = self.documents.pin();
        let mut documents: Vec<Document> = guard.iter().map(|(_, doc)| doc.clone()).collect();
        documents.sort_by(|a, b| compare_keys(a.get(self.key_field), b.get(self.key_field)));
        documents
    }

    /// Index key holding the document whose `field` equals `value`, if any.
    fn target_key(&self, field: &str, value: &Value) -> Option<IndexKey> {
        if field == self.key_field {
            return Some(index_key(value));
        }
        self.locate(field, value).map(|(key, _)| key)
    }

    pub(crate) fn save(&self, mut document: Document) -> StorageResult<Document> {
        let key = self.key_of(&document)?;
        let guard = self.documents.pin();

        match document_id(&document).map(str::to_owned) {
            None => {
                document.insert(
                    DOCUMENT_ID_FIELD.to_string(),
                    Value::String(Uuid::new_v4().to_string()),
                );
                guard
                    .try_insert(key.clone(), document.clone())
                    .map_err(|_| StorageError::duplicate_key(self.name, key))?;
            }
            Some(id) => {
                let placed = guard.compute(key.clone(), |entry| match entry {
                    Some((_, existing)) if document_id(existing) != Some(id.as_str()) => {
                        Operation::Abort(())
                    }
                    _ => Operation::Insert(document.clone()),
                });
                if matches!(placed, Compute::Aborted(())) {
                    return Err(StorageError::duplicate_key(self.name, key));
                }

                // The key field may have changed since the document was read.
                let stale: Vec<IndexKey> = guard
                    .iter()
                    .filter(|(k, doc)| **k != key && document_id(doc) == Some(id.as_str()))
                    .map(|(k, _)| k.clone())
                    .collect();
                for stale in stale {
                    guard.compute(stale, |entry| match entry {
                        Some((_, doc)) if document_id(doc) == Some(id.as_str()) => {
                            Operation::Remove
                        }
                        _ => Operation::Abort(()),
                    });
                }
            }
        }

        Ok(document)
    }

    /// Merges `changes` into the matching document in a single map operation.
    ///
    /// A change to the key field inserts under the new key first, so the
    /// unique index rejects collisions, then removes the old entry only if
    /// it is still the version that was merged. Otherwise the copy is taken
    /// back and the update starts over.
    pub(crate) fn update_one(
        &self,
        field: &str,
        value: &Value,
        changes: Document,
    ) -> StorageResult<UpdateResult> {
        let guard = self.documents.pin();
        loop {
            let Some(key) = self.target_key(field, value) else {
                return Ok(UpdateResult::unmatched());
            };

            let outcome = guard.compute(key.clone(), |entry| {
                let current = match entry {
                    Some((_, doc)) if doc.get(field) == Some(value) => doc,
                    _ => return Operation::Abort(Merge::Unmatched),
                };
                let mut updated = current.clone();
                for (name, change) in &changes {
                    if name != DOCUMENT_ID_FIELD {
                        updated.insert(name.clone(), change.clone());
                    }
                }
                if updated == *current {
                    return Operation::Abort(Merge::Unchanged);
                }
                match self.key_of(&updated) {
                    Err(err) => Operation::Abort(Merge::Invalid(err)),
                    Ok(new_key) if new_key != key => Operation::Abort(Merge::Move {
                        new_key,
                        updated,
                        expected: current.clone(),
                    }),
                    Ok(_) => Operation::Insert(updated),
                }
            });

            let (new_key, updated, expected) = match outcome {
                Compute::Aborted(Merge::Unmatched) if field == self.key_field => {
                    return Ok(UpdateResult::unmatched());
                }
                // Scanned match changed before it could be locked in.
                Compute::Aborted(Merge::Unmatched) => continue,
                Compute::Aborted(Merge::Unchanged) => return Ok(UpdateResult::matched(false)),
                Compute::Aborted(Merge::Invalid(err)) => return Err(err),
                Compute::Aborted(Merge::Move {
                    new_key,
                    updated,
                    expected,
                }) => (new_key, updated, expected),
                _ => return Ok(UpdateResult::matched(true)),
            };

            if guard.try_insert(new_key.clone(), updated.clone()).is_err() {
                return Err(StorageError::duplicate_key(self.name, new_key));
            }
            let removed = guard.compute(key, |entry| match entry {
                Some((_, doc)) if *doc == expected => Operation::Remove,
                _ => Operation::Abort(()),
            });
            if matches!(removed, Compute::Removed(..)) {
                return Ok(UpdateResult::matched(true));
            }
            guard.compute(new_key, |entry| match entry {
                Some((_, doc)) if *doc == updated => Operation::Remove,
                _ => Operation::Abort(()),
            });
        }
    }

    pub(crate) fn delete_one(&self, field: &str, value: &Value) -> DeleteResult {
        let guard = self.documents.pin();
        loop {
            let Some(key) = self.target_key(field, value) else {
                return DeleteResult::default();
            };
            let outcome = guard.compute(key, |entry| match entry {
                Some((_, doc)) if doc.get(field) == Some(value) => Operation::Remove,
                _ => Operation::Abort(()),
            });
            match outcome {
                Compute::Removed(..) => return DeleteResult { deleted_count: 1 },
                _ if field == self.key_field => return DeleteResult::default(),
                _ => continue,
            }
        }
    }

    fn len(&self) -> usize {
        self.documents.pin().len()
    }
}

/// In-memory document store backend using papaya lock-free HashMap.
///
/// This storage implementation provides:
/// - Lock-free concurrent access via papaya::HashMap
/// - A unique index on each collection's key field
/// - Backend-assigned `_id` values (UUID v4) on first insert
/// - `find_all` results in ascending key order
#[derive(Debug)]
pub struct InMemoryDocumentStore {
    collections: PapayaHashMap<&'static str, Arc<Collection>>,
}

impl InMemoryDocumentStore {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self {
            collections: PapayaHashMap::new(),
        }
    }

    /// Returns the collection for `spec`, creating it on first use.
    pub(crate) fn collection(&self, spec: &CollectionSpec) -> Arc<Collection> {
        let guard = self.collections.pin();
        guard
            .get_or_insert_with(spec.name, || Arc::new(Collection::new(spec)))
            .clone()
    }

    /// Number of documents currently held in a collection.
    pub fn count(&self, spec: &CollectionSpec) -> usize {
        self.collection(spec).len()
    }

    /// Drops every collection.
    pub fn clear(&self) {
        self.collections.pin().clear();
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}
