use std::collections::HashMap;
use std::collections::HashSet;

use serde::Serialize;
use serde_json::Value;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

pub type SubscriberId = String;

/// How a subscriber consumes its queue. Informational only: delivery
/// semantics are identical for both kinds, the tag just shows up in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriberKind {
    Poll,
    Stream,
}

/// Represents one active subscriber in the broker.
///
/// Each subscriber owns a private unbounded delivery queue: the broadcast
/// pass holds the sending half, and the transport loop that created the
/// subscription drains the receiving half outside the broker lock. The
/// unbounded channel keeps enqueue non-blocking, so one slow consumer can
/// never stall a broadcast for the others.
#[derive(Debug)]
pub struct Subscriber {
    pub id: SubscriberId,
    pub kind: SubscriberKind,
    pub sender: UnboundedSender<Value>,
}

/// The set of currently active subscribers.
///
/// The registry owns the subscriber lifecycle from registration to removal.
/// Its active-id set doubles as the completion criterion for delivery: a
/// retained message is evicted exactly when its delivered set equals the ids
/// registered here.
#[derive(Debug, Default)]
pub struct SubscriberRegistry {
    subscribers: HashMap<SubscriberId, Subscriber>,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new subscriber with a fresh id and an empty queue.
    /// Returns the id together with the receiving half of the queue.
    pub fn register(&mut self, kind: SubscriberKind) -> (SubscriberId, UnboundedReceiver<Value>) {
        let id = uuid::Uuid::new_v4().to_string();
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.insert(
            id.clone(),
            Subscriber {
                id: id.clone(),
                kind,
                sender: tx,
            },
        );
        (id, rx)
    }

    /// Removes a subscriber. Removing an id that is absent is a no-op, so
    /// cleanup paths can call this unconditionally.
    pub fn remove(&mut self, id: &SubscriberId) {
        self.subscribers.remove(id);
    }

    /// The current set of active subscriber ids, used as the pruning
    /// criterion by the broadcast pass.
    pub fn active_ids(&self) -> HashSet<SubscriberId> {
        self.subscribers.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Subscriber> {
        self.subscribers.values()
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}
