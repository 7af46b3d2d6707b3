//! Notification broadcasting for hosts that reload on route changes.
//!
//! The generator sends an event after every synthesis and regeneration so
//! a dev server or plugin host can trigger a downstream reload.

use serde::Serialize;
use tokio::sync::broadcast;

use crate::watcher::PageAction;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RouteEvent {
    /// Names, paths and trees were rebuilt from the page directory.
    Synthesized { routes: usize },
    /// The persisted tree and manifest were written.
    Regenerated {
        action: Option<PageAction>,
        path: Option<String>,
    },
    /// A regeneration cycle was aborted.
    Failed { reason: String },
}

/// Fans route events out to any number of subscribers.
#[derive(Clone)]
pub struct RouteBroadcaster {
    sender: broadcast::Sender<RouteEvent>,
}

impl RouteBroadcaster {
    /// Create a new broadcaster with specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Send an event to all subscribers
    pub fn send(&self, event: RouteEvent) {
        match self.sender.send(event.clone()) {
            Ok(count) => {
                crate::debug_event!("broadcast", "sent", "{event:?} to {count} subscribers");
            }
            Err(_) => {
                crate::debug_event!("broadcast", "dropped", "no subscribers for {event:?}");
            }
        }
    }

    /// Subscribe to receive notifications
    pub fn subscribe(&self) -> broadcast::Receiver<RouteEvent> {
        self.sender.subscribe()
    }
}

impl Default for RouteBroadcaster {
    fn default() -> Self {
        Self::new(16)
    }
}
