//! Reference-integrity guard for the referenced-only kinds.

use serde_json::Value;
use std::fmt;

use super::error::CatalogError;
use super::kinds::ResourceKind;
use super::store::{CatalogStore, RecordId};

/// One dependent kind still citing the record under deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockingReference {
    pub kind: ResourceKind,
    pub count: usize,
}

/// The full set of blocking kinds, in reference-graph order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BlockingSet(pub Vec<BlockingReference>);

impl BlockingSet {
    pub fn kinds(&self) -> Vec<ResourceKind> {
        self.0.iter().map(|b| b.kind).collect()
    }
}

impl fmt::Display for BlockingSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, b) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} {} record(s)", b.count, b.kind)?;
        }
        Ok(())
    }
}

/// Outcome of a delete-guard check.
#[derive(Debug, Clone, Default)]
pub struct DeleteCheck {
    pub blocking: BlockingSet,
}

impl DeleteCheck {
    pub fn allowed(&self) -> bool {
        self.blocking.0.is_empty()
    }
}

/// Decide whether the referenced-only record `(kind, id)` may be deleted.
///
/// Walks every dependent kind in the reference graph's declared order and
/// collects each one with at least one record citing `id`, together with
/// its count. Never short-circuits: the caller-facing conflict must name
/// every blocking kind, not just the first.
///
/// Invoking this on a leaf kind is a wiring error (`UnsupportedKind`).
///
/// The check alone is not atomic against a concurrent dependent insert;
/// callers serialize it with the subsequent delete via the reference-kind
/// locks in [`super::ops`].
pub async fn can_delete(
    store: &dyn CatalogStore,
    kind: ResourceKind,
    id: RecordId,
) -> Result<DeleteCheck, CatalogError> {
    let dependents = kind.dependents();
    if dependents.is_empty() {
        return Err(CatalogError::UnsupportedKind(kind));
    }

    let mut blocking = Vec::new();
    for dependent in dependents {
        let citing = store
            .find_by_field(dependent.kind, dependent.fk_field, &Value::from(id))
            .await?;
        if !citing.is_empty() {
            blocking.push(BlockingReference {
                kind: dependent.kind,
                count: citing.len(),
            });
        }
    }

    Ok(DeleteCheck {
        blocking: BlockingSet(blocking),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::store::MemoryStore;
    use serde_json::json;

    async fn seed_location(store: &MemoryStore) -> RecordId {
        store
            .put(
                ResourceKind::StorageLocation,
                json!({"name": "Bay A", "description": "north wall"}),
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn unreferenced_record_may_be_deleted() {
        let store = MemoryStore::new();
        let id = seed_location(&store).await;

        let check = can_delete(&store, ResourceKind::StorageLocation, id)
            .await
            .unwrap();
        assert!(check.allowed());
        assert!(check.blocking.0.is_empty());
    }

    #[tokio::test]
    async fn reports_every_blocking_kind_with_counts() {
        let store = MemoryStore::new();
        let loc = seed_location(&store).await;

        for model in ["AK", "M4"] {
            store
                .put(
                    ResourceKind::Weapon,
                    json!({"type": "Rifle", "model": model, "quantity": 1,
                           "ammunitionTypeId": 99, "storageLocationId": loc}),
                )
                .await
                .unwrap();
        }
        store
            .put(
                ResourceKind::Battery,
                json!({"type": "AA", "capacity": 2.5, "quantity": 40,
                       "storageLocationId": loc}),
            )
            .await
            .unwrap();

        let check = can_delete(&store, ResourceKind::StorageLocation, loc)
            .await
            .unwrap();
        assert!(!check.allowed());
        // Graph order, not count order: Weapon before Battery.
        assert_eq!(
            check.blocking.0,
            vec![
                BlockingReference {
                    kind: ResourceKind::Weapon,
                    count: 2
                },
                BlockingReference {
                    kind: ResourceKind::Battery,
                    count: 1
                },
            ]
        );
    }

    #[tokio::test]
    async fn records_at_other_locations_do_not_block() {
        let store = MemoryStore::new();
        let loc_a = seed_location(&store).await;
        let loc_b = store
            .put(ResourceKind::StorageLocation, json!({"name": "Bay B"}))
            .await
            .unwrap();
        store
            .put(
                ResourceKind::Food,
                json!({"type": "Beans", "quantity": 10.0,
                       "expirationDate": "2031-01-01", "storageLocationId": loc_b}),
            )
            .await
            .unwrap();

        let check = can_delete(&store, ResourceKind::StorageLocation, loc_a)
            .await
            .unwrap();
        assert!(check.allowed());
    }

    #[tokio::test]
    async fn guard_on_leaf_kind_is_unsupported() {
        let store = MemoryStore::new();
        let err = can_delete(&store, ResourceKind::Weapon, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::UnsupportedKind(ResourceKind::Weapon)));
    }

    #[tokio::test]
    async fn fuel_type_guard_checks_fuel_and_generators() {
        let store = MemoryStore::new();
        let fuel_type = store
            .put(ResourceKind::FuelType, json!({"name": "Diesel"}))
            .await
            .unwrap();
        let loc = seed_location(&store).await;
        store
            .put(
                ResourceKind::Generator,
                json!({"type": "Standby", "power": 5.0, "status": "operational",
                       "fuelTypeId": fuel_type, "storageLocationId": loc}),
            )
            .await
            .unwrap();

        let check = can_delete(&store, ResourceKind::FuelType, fuel_type)
            .await
            .unwrap();
        assert_eq!(check.blocking.kinds(), vec![ResourceKind::Generator]);
        assert_eq!(check.blocking.0[0].count, 1);
    }
}
