//! Fan-out of change events to the subscriber registry.

use std::sync::Arc;
use tracing::{debug, warn};

use super::registry::SubscriberRegistry;
use super::types::{ChangeEmitter, ChangeEvent};

/// Publishes committed mutations to every live subscriber.
///
/// Fire-and-forget per subscriber: delivery goes over a snapshot of the
/// registry, each subscriber independently. A dead subscriber is
/// disconnected on the spot; nothing propagates back to the caller.
#[derive(Clone)]
pub struct ChangeNotifier {
    registry: Arc<SubscriberRegistry>,
}

impl ChangeNotifier {
    pub fn new(registry: Arc<SubscriberRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<SubscriberRegistry> {
        &self.registry
    }

    /// Deliver `event` to every currently connected subscriber.
    ///
    /// With zero subscribers this returns immediately. A failed send means
    /// the subscriber's receiving task is gone; it is removed from the
    /// registry and the remaining snapshot still gets the event.
    pub fn publish(&self, event: ChangeEvent) {
        if self.registry.is_empty() {
            return;
        }

        let snapshot = self.registry.snapshot();
        let mut delivered = 0usize;
        for (id, tx) in snapshot {
            if tx.send(event.clone()).is_ok() {
                delivered += 1;
            } else {
                warn!(subscriber = %id, "subscriber gone, dropping from registry");
                self.registry.disconnect(id);
            }
        }

        debug!(
            action = ?event.action,
            kind = %event.resource_kind,
            id = event.resource_id,
            delivered,
            "change event published"
        );
    }
}

impl ChangeEmitter for ChangeNotifier {
    fn emit(&self, event: ChangeEvent) {
        self.publish(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ResourceKind;
    use crate::events::types::ChangeAction;

    fn event(id: i64) -> ChangeEvent {
        ChangeEvent::new(ChangeAction::Create, ResourceKind::Food, id, "Beans")
    }

    #[tokio::test]
    async fn publish_with_zero_subscribers_is_a_noop() {
        let registry = Arc::new(SubscriberRegistry::new());
        let notifier = ChangeNotifier::new(registry);
        notifier.publish(event(1));
    }

    #[tokio::test]
    async fn all_subscribers_receive_the_event() {
        let registry = Arc::new(SubscriberRegistry::new());
        let notifier = ChangeNotifier::new(Arc::clone(&registry));

        let (_a, mut rx_a) = registry.connect();
        let (_b, mut rx_b) = registry.connect();

        notifier.publish(event(1));

        assert_eq!(rx_a.recv().await.unwrap().resource_id, 1);
        assert_eq!(rx_b.recv().await.unwrap().resource_id, 1);
    }

    #[tokio::test]
    async fn dead_subscriber_is_dropped_and_others_still_delivered() {
        let registry = Arc::new(SubscriberRegistry::new());
        let notifier = ChangeNotifier::new(Arc::clone(&registry));

        let (_dead, rx_dead) = registry.connect();
        let (_live, mut rx_live) = registry.connect();
        drop(rx_dead);

        notifier.publish(event(1));

        assert_eq!(rx_live.recv().await.unwrap().resource_id, 1);
        assert_eq!(registry.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn events_arrive_in_publish_order() {
        let registry = Arc::new(SubscriberRegistry::new());
        let notifier = ChangeNotifier::new(Arc::clone(&registry));
        let (_id, mut rx) = registry.connect();

        for i in 1..=5 {
            notifier.publish(event(i));
        }
        for i in 1..=5 {
            assert_eq!(rx.recv().await.unwrap().resource_id, i);
        }
    }

    #[tokio::test]
    async fn late_subscriber_sees_only_later_events() {
        let registry = Arc::new(SubscriberRegistry::new());
        let notifier = ChangeNotifier::new(Arc::clone(&registry));

        notifier.publish(event(1));
        let (_id, mut rx) = registry.connect();
        notifier.publish(event(2));

        assert_eq!(rx.recv().await.unwrap().resource_id, 2);
        assert!(rx.try_recv().is_err());
    }
}
