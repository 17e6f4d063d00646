//! Document Store
//!
//! Embedded store of versioned JSON documents, grouped into named
//! collections. Provides the surface the application logic is written
//! against:
//!
//! - plain `get` / `set` / `update` / `delete` / `query`
//! - atomic multi-document transactions ([`DocumentStore::run_transaction`])
//!   with snapshot reads, commit-time version validation and bounded retry
//! - non-transactional bulk writes ([`WriteBatch`]) for moderation cascades
//!
//! A transaction body must be pure with respect to its inputs: under
//! contention it is re-run against a fresh snapshot until its read set
//! commits cleanly or the retry budget is exhausted.

pub mod batch;
pub mod transaction;

pub use batch::WriteBatch;
pub use transaction::Transaction;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use shared::{AppError, AppResult};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Default transaction retry cap
const DEFAULT_MAX_RETRIES: u32 = 5;

/// Fully-qualified document address
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct DocKey {
    pub collection: String,
    pub id: String,
}

impl DocKey {
    pub fn new(collection: &str, id: &str) -> Self {
        Self {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }
}

/// A committed document plus its monotonically increasing version
#[derive(Debug, Clone)]
pub(crate) struct VersionedDoc {
    pub version: u64,
    pub data: Map<String, Value>,
}

/// Merge `patch` fields into `target` (top-level fields, last write wins)
pub(crate) fn merge_fields(target: &mut Map<String, Value>, patch: Map<String, Value>) {
    for (k, v) in patch {
        target.insert(k, v);
    }
}

/// Serialize a value into a JSON object map
pub(crate) fn to_object(doc: &impl Serialize) -> AppResult<Map<String, Value>> {
    match serde_json::to_value(doc)? {
        Value::Object(map) => Ok(map),
        other => Err(AppError::internal(format!(
            "Document must serialize to a JSON object, got {other}"
        ))),
    }
}

/// Document store service — owns the committed document map
pub struct DocumentStore {
    docs: RwLock<HashMap<DocKey, VersionedDoc>>,
    max_retries: u32,
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore {
    /// Create an empty store with the default retry budget
    pub fn new() -> Self {
        Self::with_retries(DEFAULT_MAX_RETRIES)
    }

    /// Create an empty store with an explicit transaction retry cap
    pub fn with_retries(max_retries: u32) -> Self {
        tracing::debug!(max_retries, "document store initialized");
        Self {
            docs: RwLock::new(HashMap::new()),
            max_retries,
        }
    }

    /// Generate a fresh document id
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// Fetch a document's fields, or `None` if absent
    pub async fn get(&self, collection: &str, id: &str) -> AppResult<Option<Value>> {
        let docs = self.docs.read().await;
        Ok(docs
            .get(&DocKey::new(collection, id))
            .map(|doc| Value::Object(doc.data.clone())))
    }

    /// Fetch and deserialize a document
    pub async fn get_as<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
    ) -> AppResult<Option<T>> {
        match self.get(collection, id).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Write a document, replacing any existing content
    pub async fn set(&self, collection: &str, id: &str, doc: &impl Serialize) -> AppResult<()> {
        let data = to_object(doc)?;
        let mut docs = self.docs.write().await;
        let key = DocKey::new(collection, id);
        let version = docs.get(&key).map(|d| d.version + 1).unwrap_or(1);
        docs.insert(key, VersionedDoc { version, data });
        Ok(())
    }

    /// Write a document with merge semantics: existing fields not named in
    /// `doc` are left untouched; the document is created if absent.
    pub async fn set_merge(
        &self,
        collection: &str,
        id: &str,
        doc: &impl Serialize,
    ) -> AppResult<()> {
        let patch = to_object(doc)?;
        let mut docs = self.docs.write().await;
        let key = DocKey::new(collection, id);
        match docs.get_mut(&key) {
            Some(existing) => {
                existing.version += 1;
                merge_fields(&mut existing.data, patch);
            }
            None => {
                docs.insert(key, VersionedDoc { version: 1, data: patch });
            }
        }
        Ok(())
    }

    /// Patch fields of an existing document; fails if it does not exist
    pub async fn update(&self, collection: &str, id: &str, patch: &impl Serialize) -> AppResult<()> {
        let patch = to_object(patch)?;
        let mut docs = self.docs.write().await;
        let key = DocKey::new(collection, id);
        match docs.get_mut(&key) {
            Some(existing) => {
                existing.version += 1;
                merge_fields(&mut existing.data, patch);
                Ok(())
            }
            None => Err(AppError::not_found(format!("{collection}/{id}"))),
        }
    }

    /// Delete a document (no-op if absent)
    pub async fn delete(&self, collection: &str, id: &str) -> AppResult<()> {
        let mut docs = self.docs.write().await;
        docs.remove(&DocKey::new(collection, id));
        Ok(())
    }

    /// List every document in a collection, with its id injected as `id`
    pub async fn list(&self, collection: &str) -> AppResult<Vec<Value>> {
        let docs = self.docs.read().await;
        Ok(docs
            .iter()
            .filter(|(key, _)| key.collection == collection)
            .map(|(key, doc)| {
                let mut data = doc.data.clone();
                data.insert("id".to_string(), Value::String(key.id.clone()));
                Value::Object(data)
            })
            .collect())
    }

    /// Equality query over one field, with document ids injected as `id`
    pub async fn query_eq(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> AppResult<Vec<Value>> {
        let docs = self.docs.read().await;
        Ok(docs
            .iter()
            .filter(|(key, doc)| {
                key.collection == collection
                    && doc.data.get(field).and_then(Value::as_str) == Some(value)
            })
            .map(|(key, doc)| {
                let mut data = doc.data.clone();
                data.insert("id".to_string(), Value::String(key.id.clone()));
                Value::Object(data)
            })
            .collect())
    }

    /// Equality query deserialized into model structs
    pub async fn query_eq_as<T: DeserializeOwned>(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> AppResult<Vec<T>> {
        self.query_eq(collection, field, value)
            .await?
            .into_iter()
            .map(|v| serde_json::from_value(v).map_err(AppError::from))
            .collect()
    }

    /// Start a non-transactional write batch
    pub fn batch(&self) -> WriteBatch<'_> {
        WriteBatch::new(self)
    }

    /// Run `body` as an atomic transaction.
    ///
    /// Reads inside the body come from a committed snapshot and are recorded
    /// with their versions. At commit time every read document is
    /// revalidated under the write lock; staged writes apply all-or-nothing.
    /// On conflict the body is re-run against a fresh snapshot, up to the
    /// configured retry cap. A body error aborts immediately with no writes.
    pub async fn run_transaction<T, F>(&self, body: F) -> AppResult<T>
    where
        F: Fn(&mut Transaction<'_>) -> AppResult<T>,
    {
        for attempt in 0..=self.max_retries {
            let (result, reads, writes) = {
                let docs = self.docs.read().await;
                let mut tx = Transaction::new(&docs);
                let result = body(&mut tx)?;
                let (reads, writes) = tx.into_parts();
                (result, reads, writes)
            };

            let mut docs = self.docs.write().await;
            let conflict = reads.iter().any(|(key, version)| {
                docs.get(key).map(|d| d.version).unwrap_or(0) != *version
            });
            if !conflict {
                transaction::apply_writes(&mut docs, writes);
                return Ok(result);
            }
            drop(docs);
            tracing::debug!(attempt, "transaction conflict, retrying with fresh snapshot");
        }

        Err(AppError::transaction(format!(
            "aborted after {} retries (write contention)",
            self.max_retries
        )))
    }

    /// Shared write access for batch commits
    pub(crate) fn docs_mut(&self) -> &RwLock<HashMap<DocKey, VersionedDoc>> {
        &self.docs
    }
}
