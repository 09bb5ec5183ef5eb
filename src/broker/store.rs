use std::collections::HashSet;

use serde_json::Value;

use crate::broker::registry::SubscriberId;

/// Represents a single retained message in the broker.
///
/// A message carries a monotonically increasing id assigned at publish time,
/// an opaque JSON payload, and the set of subscriber ids the payload has
/// already been delivered to. The delivered set only ever grows; once it
/// matches the full set of active subscribers the message is eligible for
/// eviction.
#[derive(Debug, Clone)]
pub struct Message {
    pub id: u64,
    pub payload: Value,
    pub delivered_to: HashSet<SubscriberId>,
}

impl Message {
    /// Returns true once every id in `active` has received this message.
    ///
    /// An empty active set never counts as fully delivered: with nobody to
    /// deliver to, messages accumulate until a subscriber shows up.
    pub fn fully_delivered(&self, active: &HashSet<SubscriberId>) -> bool {
        !active.is_empty() && self.delivered_to == *active
    }
}

/// The ordered sequence of retained messages.
///
/// The store owns the message lifecycle from publish to eviction. It assigns
/// ids, keeps messages in publish order, and drops a message only when the
/// broadcast pass has delivered it to every currently active subscriber.
/// Capacity is unbounded; with no subscribers active the store grows until
/// one arrives.
#[derive(Debug, Default)]
pub struct MessageStore {
    messages: Vec<Message>,
    next_id: u64,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a new message with the next id and an empty delivered set.
    /// Returns the assigned id.
    pub fn append(&mut self, payload: Value) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.messages.push(Message {
            id,
            payload,
            delivered_to: HashSet::new(),
        });
        id
    }

    /// Removes every message already delivered to the whole `active` set.
    ///
    /// Must run after the delivery pass in the same critical section, against
    /// the post-delivery active set, so a message delivered to everyone in
    /// this pass is evicted and a message a late subscriber still lacks is
    /// not.
    pub fn prune(&mut self, active: &HashSet<SubscriberId>) {
        if active.is_empty() {
            return;
        }
        self.messages.retain(|m| !m.fully_delivered(active));
    }

    /// Mutable iteration in publish order, for the broadcast delivery pass.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Message> {
        self.messages.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
