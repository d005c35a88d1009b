//! Change-notification system for committed catalog mutations.
//!
//! - `ChangeEvent` — one immutable record per committed mutation
//! - `SubscriberRegistry` — concurrent set of live WebSocket subscribers
//! - `ChangeNotifier` — fans events out over a registry snapshot,
//!   fire-and-forget per subscriber

mod notifier;
mod registry;
mod types;

pub use notifier::ChangeNotifier;
pub use registry::{SubscriberId, SubscriberRegistry};
pub use types::{ChangeAction, ChangeEmitter, ChangeEvent};
