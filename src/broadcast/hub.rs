use std::collections::HashMap;
use std::sync::Mutex as StdMutex;

use tokio::sync::mpsc;
use uuid::Uuid;

use super::snapshot::SnapshotPayload;

pub type SubscriberId = Uuid;

/// Registry of live snapshot subscribers. Each subscriber owns the
/// receiving end of an unbounded channel; delivery is fire-and-forget per
/// tick and a failed delivery (receiver gone) removes that subscriber
/// without affecting the rest.
pub struct SubscriberHub {
    senders: StdMutex<HashMap<SubscriberId, mpsc::UnboundedSender<SnapshotPayload>>>,
}

impl SubscriberHub {
    pub fn new() -> Self {
        Self {
            senders: StdMutex::new(HashMap::new()),
        }
    }

    pub fn subscribe(&self) -> (SubscriberId, mpsc::UnboundedReceiver<SnapshotPayload>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = Uuid::new_v4();
        self.senders.lock().unwrap().insert(id, tx);
        (id, rx)
    }

    pub fn unsubscribe(&self, id: SubscriberId) {
        self.senders.lock().unwrap().remove(&id);
    }

    pub fn count(&self) -> usize {
        self.senders.lock().unwrap().len()
    }

    /// Deliver a payload to every subscriber, pruning the dead ones.
    /// Returns how many deliveries succeeded.
    pub fn broadcast(&self, payload: &SnapshotPayload) -> usize {
        let mut senders = self.senders.lock().unwrap();
        let mut dead = Vec::new();
        let mut delivered = 0;

        for (id, tx) in senders.iter() {
            if tx.send(payload.clone()).is_ok() {
                delivered += 1;
            } else {
                dead.push(*id);
            }
        }
        for id in dead {
            log::info!("dropping dead subscriber {id}");
            senders.remove(&id);
        }
        delivered
    }
}

impl Default for SubscriberHub {
    fn default() -> Self {
        Self::new()
    }
}
