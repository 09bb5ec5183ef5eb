use serde::Serialize;
use serde_json::Value;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info};

use crate::broker::registry::{SubscriberId, SubscriberKind, SubscriberRegistry};
use crate::broker::store::MessageStore;

/// Read-only snapshot of the broker state, returned by `status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BrokerStatus {
    pub stored_messages: usize,
    pub active_subscribers: usize,
}

/// Represents the broker that fans published messages out to subscribers.
///
/// The broker composes the message store and the subscriber registry under a
/// single mutual-exclusion domain: callers share it as `Arc<Mutex<Broker>>`
/// and every public operation runs as one critical section. The two halves
/// are never legal to inspect independently, because registering a subscriber
/// changes which messages may be pruned and appending a message changes what
/// must be delivered.
///
/// No operation blocks while the lock is held. Delivery enqueues onto
/// unbounded per-subscriber channels, and consumers drain their own channel
/// strictly outside the lock.
#[derive(Debug, Default)]
pub struct Broker {
    store: MessageStore,
    registry: SubscriberRegistry,
}

impl Broker {
    /// Creates a new broker with no retained messages and no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a payload to the store and returns the assigned message id.
    ///
    /// Publishing does not deliver anything by itself: the caller is expected
    /// to invoke `broadcast` afterwards. The two steps are deliberately
    /// separate to match the external publish-then-broadcast protocol.
    pub fn publish(&mut self, payload: Value) -> u64 {
        let id = self.store.append(payload);
        debug!(id, "message published");
        id
    }

    /// Pushes every undelivered retained message into each active
    /// subscriber's queue, then evicts fully-delivered messages.
    ///
    /// Messages are scanned in store order, so each subscriber's queue
    /// receives payloads in publish order. Pruning runs after the delivery
    /// pass against the post-delivery active set; pruning against a set
    /// computed before delivery could evict a message a late subscriber has
    /// not yet received, or retain one that was just delivered to everyone.
    pub fn broadcast(&mut self) {
        for msg in self.store.iter_mut() {
            for sub in self.registry.iter() {
                if msg.delivered_to.contains(&sub.id) {
                    continue;
                }
                if sub.sender.send(msg.payload.clone()).is_err() {
                    // Receiver already dropped; the subscriber is on its way
                    // out and its cleanup path will remove it. Still mark it
                    // delivered so this pass can complete.
                    debug!(subscriber = %sub.id, id = msg.id, "queue closed during delivery");
                }
                msg.delivered_to.insert(sub.id.clone());
            }
        }
        self.store.prune(&self.registry.active_ids());
    }

    /// Registers a subscriber and immediately broadcasts so it catches up on
    /// the retained backlog. Registration and catch-up run in the same
    /// critical section, so no publish can slip between them.
    pub fn subscribe(&mut self, kind: SubscriberKind) -> (SubscriberId, UnboundedReceiver<Value>) {
        let (id, rx) = self.registry.register(kind);
        info!(subscriber = %id, ?kind, "subscriber registered");
        self.broadcast();
        (id, rx)
    }

    /// Removes a subscriber. Idempotent: unknown or already-removed ids are
    /// a no-op, so every cleanup path can call this unconditionally.
    pub fn unsubscribe(&mut self, id: &SubscriberId) {
        self.registry.remove(id);
        info!(subscriber = %id, "subscriber removed");
    }

    /// Counts of retained messages and active subscribers.
    pub fn status(&self) -> BrokerStatus {
        BrokerStatus {
            stored_messages: self.store.len(),
            active_subscribers: self.registry.len(),
        }
    }
}
