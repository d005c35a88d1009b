//! Persistence seam for catalog records.
//!
//! The store holds records of every [`ResourceKind`] as JSON objects and
//! knows nothing about cross-kind relationships. Single-record operations
//! are atomic; anything broader is the ops layer's problem.

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use std::sync::atomic::{AtomicI64, Ordering};
use thiserror::Error;

use super::kinds::ResourceKind;

/// Record identity. Assigned once by the store at creation, never reused.
pub type RecordId = i64;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend failure: {0}")]
    Backend(String),

    #[error("record codec failure: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Typed record store.
///
/// All implementations must satisfy:
/// - `get` returns `Ok(None)` for a missing record, `Err` only on backend
///   failure.
/// - `put` on a record without an `id` field assigns a fresh id and returns
///   it; with an `id` it overwrites that record wholesale. The returned id
///   is the record's identity either way.
/// - `delete` returns whether the record existed; deleting a missing record
///   is not an error.
/// - Per-record mutations are atomic: no reader observes a partial write.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Read one record by kind and id.
    async fn get(&self, kind: ResourceKind, id: RecordId) -> StoreResult<Option<Value>>;

    /// All records of a kind, ordered by id.
    async fn list(&self, kind: ResourceKind) -> StoreResult<Vec<Value>>;

    /// All records of `kind` whose `field` equals `value`, ordered by id.
    async fn find_by_field(
        &self,
        kind: ResourceKind,
        field: &str,
        value: &Value,
    ) -> StoreResult<Vec<Value>>;

    /// Insert (no `id` field) or overwrite (existing `id`) a record.
    async fn put(&self, kind: ResourceKind, record: Value) -> StoreResult<RecordId>;

    /// Remove a record. Returns `true` if it existed.
    async fn delete(&self, kind: ResourceKind, id: RecordId) -> StoreResult<bool>;
}

/// In-memory store backed by a concurrent map, for serving and tests.
///
/// Ids are assigned from a single monotonically increasing counter shared
/// by all kinds, so an id is never reused even across kinds.
pub struct MemoryStore {
    records: DashMap<(ResourceKind, RecordId), Value>,
    next_id: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    /// Number of records currently stored, across all kinds.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn sorted_by_id(mut rows: Vec<(RecordId, Value)>) -> Vec<Value> {
        rows.sort_by_key(|(id, _)| *id);
        rows.into_iter().map(|(_, v)| v).collect()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn get(&self, kind: ResourceKind, id: RecordId) -> StoreResult<Option<Value>> {
        Ok(self.records.get(&(kind, id)).map(|r| r.value().clone()))
    }

    async fn list(&self, kind: ResourceKind) -> StoreResult<Vec<Value>> {
        let rows: Vec<(RecordId, Value)> = self
            .records
            .iter()
            .filter(|entry| entry.key().0 == kind)
            .map(|entry| (entry.key().1, entry.value().clone()))
            .collect();
        Ok(Self::sorted_by_id(rows))
    }

    async fn find_by_field(
        &self,
        kind: ResourceKind,
        field: &str,
        value: &Value,
    ) -> StoreResult<Vec<Value>> {
        let rows: Vec<(RecordId, Value)> = self
            .records
            .iter()
            .filter(|entry| entry.key().0 == kind && entry.value().get(field) == Some(value))
            .map(|entry| (entry.key().1, entry.value().clone()))
            .collect();
        Ok(Self::sorted_by_id(rows))
    }

    async fn put(&self, kind: ResourceKind, mut record: Value) -> StoreResult<RecordId> {
        let id = match record.get("id").and_then(Value::as_i64) {
            Some(id) => id,
            None => {
                let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                if let Some(map) = record.as_object_mut() {
                    map.insert("id".into(), Value::from(id));
                } else {
                    return Err(StoreError::Backend(format!(
                        "{} record is not a JSON object",
                        kind
                    )));
                }
                id
            }
        };
        self.records.insert((kind, id), record);
        Ok(id)
    }

    async fn delete(&self, kind: ResourceKind, id: RecordId) -> StoreResult<bool> {
        Ok(self.records.remove(&(kind, id)).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn put_assigns_fresh_ids() {
        let store = MemoryStore::new();
        let a = store
            .put(ResourceKind::FuelType, json!({"name": "Diesel"}))
            .await
            .unwrap();
        let b = store
            .put(ResourceKind::FuelType, json!({"name": "Petrol"}))
            .await
            .unwrap();
        assert_ne!(a, b);

        let read = store.get(ResourceKind::FuelType, a).await.unwrap().unwrap();
        assert_eq!(read["name"], "Diesel");
        assert_eq!(read["id"], json!(a));
    }

    #[tokio::test]
    async fn put_with_id_overwrites() {
        let store = MemoryStore::new();
        let id = store
            .put(ResourceKind::FuelType, json!({"name": "Diesel"}))
            .await
            .unwrap();
        let updated = store
            .put(ResourceKind::FuelType, json!({"id": id, "name": "Kerosene"}))
            .await
            .unwrap();
        assert_eq!(updated, id);

        let read = store.get(ResourceKind::FuelType, id).await.unwrap().unwrap();
        assert_eq!(read["name"], "Kerosene");
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn get_missing_returns_none() {
        let store = MemoryStore::new();
        assert!(store
            .get(ResourceKind::Weapon, 42)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn delete_reports_existence() {
        let store = MemoryStore::new();
        let id = store
            .put(ResourceKind::Battery, json!({"type": "AA", "quantity": 4}))
            .await
            .unwrap();
        assert!(store.delete(ResourceKind::Battery, id).await.unwrap());
        assert!(!store.delete(ResourceKind::Battery, id).await.unwrap());
        assert!(store.get(ResourceKind::Battery, id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_is_scoped_to_kind_and_ordered() {
        let store = MemoryStore::new();
        let a = store
            .put(ResourceKind::Drink, json!({"type": "Water"}))
            .await
            .unwrap();
        let b = store
            .put(ResourceKind::Drink, json!({"type": "Juice"}))
            .await
            .unwrap();
        store
            .put(ResourceKind::Food, json!({"type": "Beans"}))
            .await
            .unwrap();

        let drinks = store.list(ResourceKind::Drink).await.unwrap();
        assert_eq!(drinks.len(), 2);
        assert_eq!(drinks[0]["id"], json!(a));
        assert_eq!(drinks[1]["id"], json!(b));
    }

    #[tokio::test]
    async fn find_by_field_matches_exact_value() {
        let store = MemoryStore::new();
        store
            .put(
                ResourceKind::Weapon,
                json!({"type": "Rifle", "storageLocationId": 1}),
            )
            .await
            .unwrap();
        store
            .put(
                ResourceKind::Weapon,
                json!({"type": "Pistol", "storageLocationId": 2}),
            )
            .await
            .unwrap();

        let at_one = store
            .find_by_field(ResourceKind::Weapon, "storageLocationId", &json!(1))
            .await
            .unwrap();
        assert_eq!(at_one.len(), 1);
        assert_eq!(at_one[0]["type"], "Rifle");

        let at_three = store
            .find_by_field(ResourceKind::Weapon, "storageLocationId", &json!(3))
            .await
            .unwrap();
        assert!(at_three.is_empty());
    }

    #[tokio::test]
    async fn find_by_field_supports_string_values() {
        let store = MemoryStore::new();
        store
            .put(
                ResourceKind::Generator,
                json!({"type": "Portable", "status": "operational"}),
            )
            .await
            .unwrap();
        store
            .put(
                ResourceKind::Generator,
                json!({"type": "Standby", "status": "maintenance"}),
            )
            .await
            .unwrap();

        let operational = store
            .find_by_field(ResourceKind::Generator, "status", &json!("operational"))
            .await
            .unwrap();
        assert_eq!(operational.len(), 1);
        assert_eq!(operational[0]["type"], "Portable");
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let store = MemoryStore::new();
        let first = store
            .put(ResourceKind::Food, json!({"type": "Rice"}))
            .await
            .unwrap();
        store.delete(ResourceKind::Food, first).await.unwrap();
        let second = store
            .put(ResourceKind::Food, json!({"type": "Rice"}))
            .await
            .unwrap();
        assert!(second > first);
    }

    #[tokio::test]
    async fn concurrent_puts_get_distinct_ids() {
        use std::collections::HashSet;
        use std::sync::Arc;

        let store = Arc::new(MemoryStore::new());
        let mut handles = Vec::new();
        for i in 0..16 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .put(ResourceKind::Battery, json!({"type": format!("cell-{i}")}))
                    .await
                    .unwrap()
            }));
        }

        let mut seen = HashSet::new();
        for handle in handles {
            assert!(seen.insert(handle.await.unwrap()));
        }
        assert_eq!(store.len(), 16);
    }
}
