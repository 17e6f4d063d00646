//! Transaction handle
//!
//! Scoped view handed to a transaction body: snapshot reads with version
//! tracking, and staged writes that only land if the whole transaction
//! commits. Staged writes are visible to later reads in the same body, and
//! a read that only saw the body's own write does not join the read set.

use super::{merge_fields, to_object, DocKey, VersionedDoc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use shared::{AppError, AppResult};
use std::collections::HashMap;

/// A write staged inside a transaction
#[derive(Debug)]
pub(crate) enum StagedWrite {
    /// Full replace, or field merge when `merge` is set
    Set {
        data: Map<String, Value>,
        merge: bool,
    },
    /// Field patch of an existing document
    Update { patch: Map<String, Value> },
}

/// Transaction handle offering `get`/`set`/`update` scoped to one atomic
/// commit. Obtained through [`super::DocumentStore::run_transaction`].
pub struct Transaction<'a> {
    snapshot: &'a HashMap<DocKey, VersionedDoc>,
    reads: HashMap<DocKey, u64>,
    writes: Vec<(DocKey, StagedWrite)>,
}

impl<'a> Transaction<'a> {
    pub(crate) fn new(snapshot: &'a HashMap<DocKey, VersionedDoc>) -> Self {
        Self {
            snapshot,
            reads: HashMap::new(),
            writes: Vec::new(),
        }
    }

    pub(crate) fn into_parts(self) -> (HashMap<DocKey, u64>, Vec<(DocKey, StagedWrite)>) {
        (self.reads, self.writes)
    }

    /// Read a document. Committed reads are recorded with their version for
    /// commit-time validation; the body's own staged writes are layered on
    /// top of the snapshot.
    pub fn get(&mut self, collection: &str, id: &str) -> Option<Value> {
        let key = DocKey::new(collection, id);
        let committed = self.snapshot.get(&key);

        // Record the committed version (0 = absent) exactly once
        self.reads
            .entry(key.clone())
            .or_insert_with(|| committed.map(|d| d.version).unwrap_or(0));

        let mut data: Option<Map<String, Value>> = committed.map(|d| d.data.clone());
        for (write_key, write) in &self.writes {
            if *write_key != key {
                continue;
            }
            match write {
                StagedWrite::Set { data: set_data, merge } => {
                    if *merge {
                        let target = data.get_or_insert_with(Map::new);
                        merge_fields(target, set_data.clone());
                    } else {
                        data = Some(set_data.clone());
                    }
                }
                StagedWrite::Update { patch } => {
                    if let Some(target) = data.as_mut() {
                        merge_fields(target, patch.clone());
                    }
                }
            }
        }
        data.map(Value::Object)
    }

    /// Read and deserialize a document
    pub fn get_as<T: DeserializeOwned>(&mut self, collection: &str, id: &str) -> AppResult<Option<T>> {
        match self.get(collection, id) {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Stage a full document write
    pub fn set(&mut self, collection: &str, id: &str, doc: &impl Serialize) -> AppResult<()> {
        let data = to_object(doc)?;
        self.writes
            .push((DocKey::new(collection, id), StagedWrite::Set { data, merge: false }));
        Ok(())
    }

    /// Stage a merge write: named fields land, everything else is untouched,
    /// the document is created if absent. Idempotent for pure key-derived
    /// documents like the ingredient vocabulary.
    pub fn set_merge(&mut self, collection: &str, id: &str, doc: &impl Serialize) -> AppResult<()> {
        let data = to_object(doc)?;
        self.writes
            .push((DocKey::new(collection, id), StagedWrite::Set { data, merge: true }));
        Ok(())
    }

    /// Stage a field patch of an existing document
    pub fn update(&mut self, collection: &str, id: &str, patch: &impl Serialize) -> AppResult<()> {
        let patch = to_object(patch)?;
        self.writes
            .push((DocKey::new(collection, id), StagedWrite::Update { patch }));
        Ok(())
    }

    /// Stage an insert under a freshly generated id and return that id
    pub fn insert(&mut self, collection: &str, doc: &impl Serialize) -> AppResult<String> {
        let id = super::DocumentStore::generate_id();
        self.set(collection, &id, doc)?;
        Ok(id)
    }
}

/// Apply staged writes to the committed map, bumping versions in order
pub(crate) fn apply_writes(
    docs: &mut HashMap<DocKey, VersionedDoc>,
    writes: Vec<(DocKey, StagedWrite)>,
) {
    for (key, write) in writes {
        match write {
            StagedWrite::Set { data, merge: false } => {
                let version = docs.get(&key).map(|d| d.version + 1).unwrap_or(1);
                docs.insert(key, VersionedDoc { version, data });
            }
            StagedWrite::Set { data, merge: true } => match docs.get_mut(&key) {
                Some(existing) => {
                    existing.version += 1;
                    merge_fields(&mut existing.data, data);
                }
                None => {
                    docs.insert(key, VersionedDoc { version: 1, data });
                }
            },
            StagedWrite::Update { patch } => {
                // The read set was validated at commit, so the target still
                // exists whenever it was staged after an in-transaction read.
                match docs.get_mut(&key) {
                    Some(existing) => {
                        existing.version += 1;
                        merge_fields(&mut existing.data, patch);
                    }
                    None => {
                        tracing::warn!(
                            collection = %key.collection,
                            id = %key.id,
                            "transactional update on missing document, creating from patch"
                        );
                        docs.insert(key, VersionedDoc { version: 1, data: patch });
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot_with(
        entries: &[(&str, &str, Value)],
    ) -> HashMap<DocKey, VersionedDoc> {
        entries
            .iter()
            .map(|(collection, id, value)| {
                (
                    DocKey::new(collection, id),
                    VersionedDoc {
                        version: 1,
                        data: value.as_object().unwrap().clone(),
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_own_writes_visible_to_later_reads() {
        let snapshot = HashMap::new();
        let mut tx = Transaction::new(&snapshot);
        tx.set("sandwiches", "s1", &json!({"name": "BEC"})).unwrap();
        let doc = tx.get("sandwiches", "s1").unwrap();
        assert_eq!(doc["name"], "BEC");
    }

    #[test]
    fn test_read_records_committed_version_once() {
        let snapshot = snapshot_with(&[("sandwiches", "s1", json!({"reviewCount": 2}))]);
        let mut tx = Transaction::new(&snapshot);
        tx.get("sandwiches", "s1");
        tx.update("sandwiches", "s1", &json!({"reviewCount": 3})).unwrap();
        // Re-read sees the staged patch but keeps the committed version
        let doc = tx.get("sandwiches", "s1").unwrap();
        assert_eq!(doc["reviewCount"], 3);

        let (reads, _) = tx.into_parts();
        assert_eq!(reads[&DocKey::new("sandwiches", "s1")], 1);
    }

    #[test]
    fn test_absent_read_recorded_as_version_zero() {
        let snapshot = HashMap::new();
        let mut tx = Transaction::new(&snapshot);
        assert!(tx.get("sandwiches", "ghost").is_none());
        let (reads, _) = tx.into_parts();
        assert_eq!(reads[&DocKey::new("sandwiches", "ghost")], 0);
    }

    #[test]
    fn test_apply_writes_merge_keeps_unrelated_fields() {
        let mut docs = snapshot_with(&[("ingredients", "bacon", json!({"pinned": true}))]);
        apply_writes(
            &mut docs,
            vec![(
                DocKey::new("ingredients", "bacon"),
                StagedWrite::Set {
                    data: json!({"name": "bacon"}).as_object().unwrap().clone(),
                    merge: true,
                },
            )],
        );
        let doc = &docs[&DocKey::new("ingredients", "bacon")];
        assert_eq!(doc.data["pinned"], true);
        assert_eq!(doc.data["name"], "bacon");
        assert_eq!(doc.version, 2);
    }
}
