//! Change event types for WebSocket notifications.

use serde::{Deserialize, Serialize};

use crate::catalog::{RecordId, ResourceKind};

/// The mutation that produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeAction {
    Create,
    Update,
    Delete,
}

/// One committed mutation, as delivered to subscribers.
///
/// Must be Clone — each subscriber in a publish snapshot gets its own copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEvent {
    pub action: ChangeAction,
    #[serde(rename = "resourceType")]
    pub resource_kind: ResourceKind,
    pub resource_id: RecordId,
    /// Human-readable summary ("Weapon created: Rifle AK"). Cosmetic;
    /// subscribers must not parse it.
    pub message: String,
    /// ISO 8601 commit timestamp.
    pub timestamp: String,
}

impl ChangeEvent {
    pub fn new(
        action: ChangeAction,
        resource_kind: ResourceKind,
        resource_id: RecordId,
        message: impl Into<String>,
    ) -> Self {
        Self {
            action,
            resource_kind,
            resource_id,
            message: message.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Seam between the resource operations and the delivery mechanism.
///
/// Emitting is fire-and-forget: implementations never block the caller on
/// subscriber I/O and never surface delivery failures.
pub trait ChangeEmitter: Send + Sync {
    fn emit(&self, event: ChangeEvent);

    fn emit_created(&self, kind: ResourceKind, id: RecordId, details: &str) {
        self.emit(ChangeEvent::new(
            ChangeAction::Create,
            kind,
            id,
            format!("{} created: {}", kind, details),
        ));
    }

    fn emit_updated(&self, kind: ResourceKind, id: RecordId, details: &str) {
        self.emit(ChangeEvent::new(
            ChangeAction::Update,
            kind,
            id,
            format!("{} updated: {}", kind, details),
        ));
    }

    fn emit_deleted(&self, kind: ResourceKind, id: RecordId, details: &str) {
        self.emit(ChangeEvent::new(
            ChangeAction::Delete,
            kind,
            id,
            format!("{} deleted: {}", kind, details),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingEmitter {
        events: Mutex<Vec<ChangeEvent>>,
    }

    impl ChangeEmitter for RecordingEmitter {
        fn emit(&self, event: ChangeEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    #[test]
    fn test_action_wire_format() {
        assert_eq!(
            serde_json::to_string(&ChangeAction::Create).unwrap(),
            "\"CREATE\""
        );
        assert_eq!(
            serde_json::to_string(&ChangeAction::Delete).unwrap(),
            "\"DELETE\""
        );
    }

    #[test]
    fn test_event_wire_field_names() {
        let event = ChangeEvent::new(
            ChangeAction::Update,
            ResourceKind::Weapon,
            7,
            "Weapon updated: Rifle AK",
        );
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["action"], "UPDATE");
        assert_eq!(json["resourceType"], "Weapon");
        assert_eq!(json["resourceId"], 7);
        assert_eq!(json["message"], "Weapon updated: Rifle AK");
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn test_emit_helpers_compose_messages() {
        let emitter = RecordingEmitter::default();
        emitter.emit_created(ResourceKind::StorageLocation, 1, "Bay A");
        emitter.emit_deleted(ResourceKind::Food, 2, "Beans");

        let events = emitter.events.lock().unwrap();
        assert_eq!(events[0].action, ChangeAction::Create);
        assert_eq!(events[0].message, "StorageLocation created: Bay A");
        assert_eq!(events[1].action, ChangeAction::Delete);
        assert_eq!(events[1].message, "Food deleted: Beans");
    }

    #[test]
    fn test_event_serde_roundtrip() {
        let event = ChangeEvent::new(ChangeAction::Create, ResourceKind::Drink, 12, "Water");
        let json = serde_json::to_string(&event).unwrap();
        let back: ChangeEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
