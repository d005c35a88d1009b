//! Generic resource operations: the only component that touches the store,
//! the delete guard, and the change notifier together.
//!
//! One orchestration, parameterized over [`CatalogRecord`] metadata,
//! instead of a hand-copied variant per entity kind. Every successful
//! mutation emits exactly one change event, after the store commit;
//! rejected mutations leave the store untouched and emit nothing.

use serde_json::Value;
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::info;

use super::error::CatalogError;
use super::guard;
use super::kinds::ResourceKind;
use super::models::{CatalogRecord, ForeignKey};
use super::store::{CatalogStore, RecordId};
use crate::events::ChangeEmitter;

/// One lock per referenced kind.
///
/// Creating or updating a leaf record holds the *read* lock of every kind
/// it cites while foreign keys are resolved and the write lands; deleting
/// a referenced record holds its kind's *write* lock across the guard
/// check and the delete. A dependent insert therefore either commits
/// before the guard reads (and vetoes the delete) or starts after the
/// delete (and fails foreign-key resolution) — the check and the delete
/// are never two unsynchronized steps.
#[derive(Default)]
struct ReferenceLocks {
    storage_location: RwLock<()>,
    ammunition_type: RwLock<()>,
    fuel_type: RwLock<()>,
}

impl ReferenceLocks {
    fn get(&self, kind: ResourceKind) -> Option<&RwLock<()>> {
        match kind {
            ResourceKind::StorageLocation => Some(&self.storage_location),
            ResourceKind::AmmunitionType => Some(&self.ammunition_type),
            ResourceKind::FuelType => Some(&self.fuel_type),
            _ => None,
        }
    }
}

/// Orchestrates validation-of-references, store mutation, the delete guard,
/// and change notification for every entity kind.
pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
    emitter: Arc<dyn ChangeEmitter>,
    ref_locks: ReferenceLocks,
}

impl CatalogService {
    pub fn new(store: Arc<dyn CatalogStore>, emitter: Arc<dyn ChangeEmitter>) -> Self {
        Self {
            store,
            emitter,
            ref_locks: ReferenceLocks::default(),
        }
    }

    pub fn store(&self) -> &Arc<dyn CatalogStore> {
        &self.store
    }

    /// Insert a new record after resolving every foreign key it holds.
    pub async fn create<R: CatalogRecord>(&self, mut record: R) -> Result<R, CatalogError> {
        let keys = record.foreign_keys();
        let _cited = self.cite_guards(&keys).await;
        self.resolve_foreign_keys(&keys).await?;

        let mut value = serde_json::to_value(&record).map_err(CatalogError::codec)?;
        if let Some(map) = value.as_object_mut() {
            // Identity is the store's to assign.
            map.remove("id");
        }
        let id = self.store.put(R::KIND, value).await?;
        record.assign_id(id);

        info!(kind = %R::KIND, id, "record created");
        self.emitter.emit_created(R::KIND, id, &record.summary());
        Ok(record)
    }

    /// Wholesale replacement of the record's mutable fields, id unchanged.
    /// Foreign keys in the incoming payload are re-resolved exactly as on
    /// create.
    pub async fn update<R: CatalogRecord>(
        &self,
        id: RecordId,
        mut record: R,
    ) -> Result<R, CatalogError> {
        let keys = record.foreign_keys();
        let _cited = self.cite_guards(&keys).await;

        if self.store.get(R::KIND, id).await?.is_none() {
            return Err(CatalogError::NotFound { kind: R::KIND, id });
        }
        self.resolve_foreign_keys(&keys).await?;

        record.assign_id(id);
        let value = serde_json::to_value(&record).map_err(CatalogError::codec)?;
        self.store.put(R::KIND, value).await?;

        info!(kind = %R::KIND, id, "record updated");
        self.emitter.emit_updated(R::KIND, id, &record.summary());
        Ok(record)
    }

    /// Remove a record. Referenced-only kinds pass the delete guard first;
    /// a veto aborts with the full blocking-kind set and no side effects.
    pub async fn delete<R: CatalogRecord>(&self, id: RecordId) -> Result<(), CatalogError> {
        let kind = R::KIND;
        // Serializes the guard check and the delete against concurrent
        // dependent inserts. None for leaf kinds.
        let _own: Option<RwLockWriteGuard<'_, ()>> = match self.ref_locks.get(kind) {
            Some(lock) => Some(lock.write().await),
            None => None,
        };

        let value = self
            .store
            .get(kind, id)
            .await?
            .ok_or(CatalogError::NotFound { kind, id })?;
        let record: R = serde_json::from_value(value).map_err(CatalogError::codec)?;

        if kind.is_referenced() {
            let check = guard::can_delete(self.store.as_ref(), kind, id).await?;
            if !check.allowed() {
                return Err(CatalogError::ReferentialConflict {
                    kind,
                    id,
                    blocking: check.blocking,
                });
            }
        }

        self.store.delete(kind, id).await?;

        info!(kind = %kind, id, "record deleted");
        self.emitter.emit_deleted(kind, id, &record.summary());
        Ok(())
    }

    pub async fn get<R: CatalogRecord>(&self, id: RecordId) -> Result<R, CatalogError> {
        let value = self
            .store
            .get(R::KIND, id)
            .await?
            .ok_or(CatalogError::NotFound { kind: R::KIND, id })?;
        serde_json::from_value(value).map_err(CatalogError::codec)
    }

    pub async fn list<R: CatalogRecord>(&self) -> Result<Vec<R>, CatalogError> {
        self.store
            .list(R::KIND)
            .await?
            .into_iter()
            .map(|value| serde_json::from_value(value).map_err(CatalogError::codec))
            .collect()
    }

    pub async fn find_by_field<R: CatalogRecord>(
        &self,
        field: &str,
        value: &Value,
    ) -> Result<Vec<R>, CatalogError> {
        self.store
            .find_by_field(R::KIND, field, value)
            .await?
            .into_iter()
            .map(|v| serde_json::from_value(v).map_err(CatalogError::codec))
            .collect()
    }

    async fn cite_guards(&self, keys: &[ForeignKey]) -> Vec<RwLockReadGuard<'_, ()>> {
        let mut kinds: Vec<ResourceKind> = keys.iter().map(|key| key.kind).collect();
        kinds.sort();
        kinds.dedup();

        let mut guards = Vec::with_capacity(kinds.len());
        for kind in kinds {
            if let Some(lock) = self.ref_locks.get(kind) {
                guards.push(lock.read().await);
            }
        }
        guards
    }

    async fn resolve_foreign_keys(&self, keys: &[ForeignKey]) -> Result<(), CatalogError> {
        for key in keys {
            if self.store.get(key.kind, key.id).await?.is_none() {
                return Err(CatalogError::ReferenceNotFound {
                    kind: key.kind,
                    id: key.id,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::models::*;
    use crate::catalog::store::MemoryStore;
    use crate::events::{ChangeAction, ChangeEvent};
    use chrono::{Duration, Utc};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingEmitter {
        events: Mutex<Vec<ChangeEvent>>,
    }

    impl RecordingEmitter {
        fn events(&self) -> Vec<ChangeEvent> {
            self.events.lock().unwrap().clone()
        }
    }

    impl ChangeEmitter for RecordingEmitter {
        fn emit(&self, event: ChangeEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    struct Fixture {
        service: CatalogService,
        store: Arc<MemoryStore>,
        emitter: Arc<RecordingEmitter>,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let emitter = Arc::new(RecordingEmitter::default());
        let service = CatalogService::new(
            Arc::clone(&store) as Arc<dyn CatalogStore>,
            Arc::clone(&emitter) as Arc<dyn ChangeEmitter>,
        );
        Fixture {
            service,
            store,
            emitter,
        }
    }

    fn location(name: &str) -> StorageLocation {
        StorageLocation {
            id: None,
            name: name.into(),
            description: None,
        }
    }

    fn ammo_type() -> AmmunitionType {
        AmmunitionType {
            id: None,
            caliber: "7.62mm".into(),
            type_name: "FMJ".into(),
        }
    }

    fn weapon(ammo: RecordId, loc: RecordId) -> Weapon {
        Weapon {
            id: None,
            weapon_type: "Rifle".into(),
            model: "AK".into(),
            quantity: 3,
            ammunition_type_id: ammo,
            storage_location_id: loc,
        }
    }

    fn food(loc: RecordId) -> Food {
        Food {
            id: None,
            food_type: "Beans".into(),
            quantity: 12.0,
            expiration_date: Utc::now().date_naive() + Duration::days(180),
            storage_location_id: loc,
        }
    }

    #[tokio::test]
    async fn create_assigns_id_and_publishes_once() {
        let fx = fixture();
        let created = fx.service.create(location("Bay A")).await.unwrap();
        let id = created.id.unwrap();

        let events = fx.emitter.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].action, ChangeAction::Create);
        assert_eq!(events[0].resource_kind, ResourceKind::StorageLocation);
        assert_eq!(events[0].resource_id, id);
        assert_eq!(events[0].message, "StorageLocation created: Bay A");
    }

    #[tokio::test]
    async fn create_with_dangling_location_is_rejected_without_side_effects() {
        let fx = fixture();
        let ammo = fx.service.create(ammo_type()).await.unwrap();
        let before = fx.emitter.events().len();

        let err = fx
            .service
            .create(weapon(ammo.id.unwrap(), 999))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::ReferenceNotFound {
                kind: ResourceKind::StorageLocation,
                id: 999
            }
        ));
        assert!(fx.store.list(ResourceKind::Weapon).await.unwrap().is_empty());
        assert_eq!(fx.emitter.events().len(), before);
    }

    #[tokio::test]
    async fn create_reports_the_missing_reference_kind() {
        let fx = fixture();
        let loc = fx.service.create(location("Bay A")).await.unwrap();

        let err = fx
            .service
            .create(weapon(555, loc.id.unwrap()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::ReferenceNotFound {
                kind: ResourceKind::AmmunitionType,
                id: 555
            }
        ));
    }

    #[tokio::test]
    async fn update_replaces_fields_and_keeps_id() {
        let fx = fixture();
        let loc = fx.service.create(location("Bay A")).await.unwrap();
        let id = loc.id.unwrap();

        let updated = fx
            .service
            .update(
                id,
                StorageLocation {
                    id: None,
                    name: "Bay A (renamed)".into(),
                    description: Some("north wall".into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.id, Some(id));

        let read: StorageLocation = fx.service.get(id).await.unwrap();
        assert_eq!(read.name, "Bay A (renamed)");

        let events = fx.emitter.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].action, ChangeAction::Update);
        assert_eq!(events[1].resource_id, id);
    }

    #[tokio::test]
    async fn update_missing_record_is_not_found() {
        let fx = fixture();
        let err = fx
            .service
            .update(404, location("Nowhere"))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::NotFound { .. }));
        assert!(fx.emitter.events().is_empty());
    }

    #[tokio::test]
    async fn update_revalidates_foreign_keys() {
        let fx = fixture();
        let loc = fx.service.create(location("Bay A")).await.unwrap();
        let ammo = fx.service.create(ammo_type()).await.unwrap();
        let created = fx
            .service
            .create(weapon(ammo.id.unwrap(), loc.id.unwrap()))
            .await
            .unwrap();

        let mut payload = weapon(ammo.id.unwrap(), 777);
        payload.model = "AKM".into();
        let err = fx
            .service
            .update(created.id.unwrap(), payload)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::ReferenceNotFound {
                kind: ResourceKind::StorageLocation,
                id: 777
            }
        ));

        // Record unchanged.
        let read: Weapon = fx.service.get(created.id.unwrap()).await.unwrap();
        assert_eq!(read.model, "AK");
    }

    #[tokio::test]
    async fn delete_missing_record_is_not_found() {
        let fx = fixture();
        let err = fx.service.delete::<Food>(404).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound { .. }));
        assert!(fx.emitter.events().is_empty());
    }

    #[tokio::test]
    async fn delete_of_unreferenced_location_publishes_exactly_one_event() {
        let fx = fixture();
        let loc = fx.service.create(location("Bay A")).await.unwrap();
        let id = loc.id.unwrap();

        fx.service.delete::<StorageLocation>(id).await.unwrap();

        let deletes: Vec<_> = fx
            .emitter
            .events()
            .into_iter()
            .filter(|e| e.action == ChangeAction::Delete)
            .collect();
        assert_eq!(deletes.len(), 1);
        assert_eq!(deletes[0].resource_id, id);
        assert!(fx
            .store
            .get(ResourceKind::StorageLocation, id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn vetoed_delete_reports_every_blocking_kind_and_touches_nothing() {
        let fx = fixture();
        let loc = fx.service.create(location("Bay A")).await.unwrap();
        let loc_id = loc.id.unwrap();
        let ammo = fx.service.create(ammo_type()).await.unwrap();

        fx.service
            .create(weapon(ammo.id.unwrap(), loc_id))
            .await
            .unwrap();
        fx.service.create(food(loc_id)).await.unwrap();
        fx.service.create(food(loc_id)).await.unwrap();

        let before = fx.emitter.events().len();
        let err = fx.service.delete::<StorageLocation>(loc_id).await.unwrap_err();

        match err {
            CatalogError::ReferentialConflict { id, blocking, .. } => {
                assert_eq!(id, loc_id);
                let kinds = blocking.kinds();
                assert_eq!(kinds, vec![ResourceKind::Weapon, ResourceKind::Food]);
                assert_eq!(blocking.0[0].count, 1);
                assert_eq!(blocking.0[1].count, 2);
            }
            other => panic!("expected ReferentialConflict, got {other:?}"),
        }

        // No delete event, record still present.
        assert_eq!(fx.emitter.events().len(), before);
        assert!(fx
            .store
            .get(ResourceKind::StorageLocation, loc_id)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn bay_a_scenario_delete_order() {
        let fx = fixture();
        let loc = fx.service.create(location("Bay A")).await.unwrap();
        let loc_id = loc.id.unwrap();
        let ammo = fx.service.create(ammo_type()).await.unwrap();
        let rifle = fx
            .service
            .create(weapon(ammo.id.unwrap(), loc_id))
            .await
            .unwrap();

        // Blocked while the weapon exists.
        let err = fx.service.delete::<StorageLocation>(loc_id).await.unwrap_err();
        match err {
            CatalogError::ReferentialConflict { blocking, .. } => {
                assert_eq!(blocking.kinds(), vec![ResourceKind::Weapon]);
                assert_eq!(blocking.0[0].count, 1);
            }
            other => panic!("expected ReferentialConflict, got {other:?}"),
        }

        // Weapon first, then the location.
        fx.service.delete::<Weapon>(rifle.id.unwrap()).await.unwrap();
        fx.service.delete::<StorageLocation>(loc_id).await.unwrap();

        let deletes: Vec<_> = fx
            .emitter
            .events()
            .into_iter()
            .filter(|e| e.action == ChangeAction::Delete)
            .map(|e| e.resource_kind)
            .collect();
        assert_eq!(
            deletes,
            vec![ResourceKind::Weapon, ResourceKind::StorageLocation]
        );
    }

    #[tokio::test]
    async fn fuel_type_delete_guard_covers_both_dependents() {
        let fx = fixture();
        let loc = fx.service.create(location("Fuel shed")).await.unwrap();
        let diesel = fx
            .service
            .create(FuelType {
                id: None,
                name: "Diesel".into(),
            })
            .await
            .unwrap();
        let diesel_id = diesel.id.unwrap();

        fx.service
            .create(Fuel {
                id: None,
                quantity: 80.0,
                fuel_type_id: diesel_id,
                storage_location_id: loc.id.unwrap(),
            })
            .await
            .unwrap();
        fx.service
            .create(Generator {
                id: None,
                generator_type: "Standby".into(),
                power: 5.5,
                status: "operational".into(),
                fuel_type_id: diesel_id,
                storage_location_id: loc.id.unwrap(),
            })
            .await
            .unwrap();

        let err = fx.service.delete::<FuelType>(diesel_id).await.unwrap_err();
        match err {
            CatalogError::ReferentialConflict { blocking, .. } => {
                assert_eq!(
                    blocking.kinds(),
                    vec![ResourceKind::Fuel, ResourceKind::Generator]
                );
            }
            other => panic!("expected ReferentialConflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn two_subscribers_see_commits_until_they_disconnect() {
        use crate::events::{ChangeNotifier, SubscriberRegistry};

        let store = Arc::new(MemoryStore::new());
        let registry = Arc::new(SubscriberRegistry::new());
        let notifier = Arc::new(ChangeNotifier::new(Arc::clone(&registry)));
        let service = CatalogService::new(
            Arc::clone(&store) as Arc<dyn CatalogStore>,
            notifier as Arc<dyn ChangeEmitter>,
        );

        let loc = service.create(location("Pantry")).await.unwrap();

        let (sub_a, mut rx_a) = registry.connect();
        let (_sub_b, mut rx_b) = registry.connect();

        let beans = service.create(food(loc.id.unwrap())).await.unwrap();
        let beans_id = beans.id.unwrap();

        let seen_a = rx_a.recv().await.unwrap();
        let seen_b = rx_b.recv().await.unwrap();
        assert_eq!(seen_a.action, ChangeAction::Create);
        assert_eq!(seen_a.resource_id, beans_id);
        assert_eq!(seen_b.resource_id, beans_id);

        registry.disconnect(sub_a);

        service.delete::<Food>(beans_id).await.unwrap();

        let seen_b = rx_b.recv().await.unwrap();
        assert_eq!(seen_b.action, ChangeAction::Delete);
        assert_eq!(seen_b.resource_id, beans_id);
        // A's queue got nothing after the disconnect.
        assert!(rx_a.try_recv().is_err());
    }

    #[tokio::test]
    async fn concurrent_dependent_creates_and_guarded_delete_stay_consistent() {
        // The delete either wins (later creates fail FK resolution) or the
        // creates win (delete is vetoed); either way no dangling reference
        // survives.
        let fx = fixture();
        let loc = fx.service.create(location("Bay A")).await.unwrap();
        let loc_id = loc.id.unwrap();

        let service = Arc::new(fx.service);
        let mut creates = Vec::new();
        for _ in 0..8 {
            let service = Arc::clone(&service);
            creates.push(tokio::spawn(async move {
                service.create(food(loc_id)).await.is_ok()
            }));
        }
        let deleter = {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.delete::<StorageLocation>(loc_id).await.is_ok() })
        };

        let mut created = 0usize;
        for handle in creates {
            if handle.await.unwrap() {
                created += 1;
            }
        }
        let deleted = deleter.await.unwrap();

        let location_exists = fx
            .store
            .get(ResourceKind::StorageLocation, loc_id)
            .await
            .unwrap()
            .is_some();
        let food_rows = fx.store.list(ResourceKind::Food).await.unwrap().len();

        assert_eq!(deleted, !location_exists);
        assert_eq!(food_rows, created);
        if !location_exists {
            // Delete won: nothing may cite the dead id.
            assert_eq!(food_rows, 0);
        }
    }
}
