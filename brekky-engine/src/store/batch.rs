//! Write Batch
//!
//! Non-transactional bulk writes: staged sets/deletes applied in one lock
//! acquisition, without conflict detection. Used by the moderation cascades.

use super::{merge_fields, to_object, DocKey, DocumentStore, VersionedDoc};
use serde::Serialize;
use shared::AppResult;

enum BatchOp {
    Set { key: DocKey, data: serde_json::Map<String, serde_json::Value>, merge: bool },
    Delete { key: DocKey },
}

/// Staged bulk write against a [`DocumentStore`]
pub struct WriteBatch<'a> {
    store: &'a DocumentStore,
    ops: Vec<BatchOp>,
}

impl<'a> WriteBatch<'a> {
    pub(crate) fn new(store: &'a DocumentStore) -> Self {
        Self { store, ops: Vec::new() }
    }

    /// Number of staged operations
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// True if nothing is staged
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Stage a full document write
    pub fn set(&mut self, collection: &str, id: &str, doc: &impl Serialize) -> AppResult<&mut Self> {
        let data = to_object(doc)?;
        self.ops.push(BatchOp::Set { key: DocKey::new(collection, id), data, merge: false });
        Ok(self)
    }

    /// Stage a merge write
    pub fn set_merge(
        &mut self,
        collection: &str,
        id: &str,
        doc: &impl Serialize,
    ) -> AppResult<&mut Self> {
        let data = to_object(doc)?;
        self.ops.push(BatchOp::Set { key: DocKey::new(collection, id), data, merge: true });
        Ok(self)
    }

    /// Stage a delete
    pub fn delete(&mut self, collection: &str, id: &str) -> &mut Self {
        self.ops.push(BatchOp::Delete { key: DocKey::new(collection, id) });
        self
    }

    /// Apply every staged operation under one write lock
    pub async fn commit(self) -> AppResult<()> {
        let mut docs = self.store.docs_mut().write().await;
        for op in self.ops {
            match op {
                BatchOp::Set { key, data, merge: false } => {
                    let version = docs.get(&key).map(|d| d.version + 1).unwrap_or(1);
                    docs.insert(key, VersionedDoc { version, data });
                }
                BatchOp::Set { key, data, merge: true } => match docs.get_mut(&key) {
                    Some(existing) => {
                        existing.version += 1;
                        merge_fields(&mut existing.data, data);
                    }
                    None => {
                        docs.insert(key, VersionedDoc { version: 1, data });
                    }
                },
                BatchOp::Delete { key } => {
                    docs.remove(&key);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_batch_set_and_delete() {
        let store = DocumentStore::new();
        store.set("reviews", "a", &json!({"rating": 5})).await.unwrap();

        let mut batch = store.batch();
        batch.set("reviews", "b", &json!({"rating": 3})).unwrap();
        batch.delete("reviews", "a");
        assert_eq!(batch.len(), 2);
        batch.commit().await.unwrap();

        assert!(store.get("reviews", "a").await.unwrap().is_none());
        assert!(store.get("reviews", "b").await.unwrap().is_some());
    }
}
