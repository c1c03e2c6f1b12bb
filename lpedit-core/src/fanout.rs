//! Snapshot fan-out to registered observers.

use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::snapshot::PodSnapshot;

/// Handle used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Receiving end of a subscription. Snapshots arrive in publish order.
pub struct Subscription {
    pub id: SubscriptionId,
    pub receiver: Receiver<Arc<PodSnapshot>>,
}

impl Subscription {
    /// Drain everything published since the last call, oldest first.
    pub fn drain(&self) -> Vec<Arc<PodSnapshot>> {
        self.receiver.try_iter().collect()
    }

    /// Newest pending snapshot, discarding the ones before it.
    pub fn latest(&self) -> Option<Arc<PodSnapshot>> {
        self.receiver.try_iter().last()
    }
}

/// Registry of observers. Each gets every snapshot, in order.
#[derive(Default)]
pub struct Subscribers {
    next_id: u64,
    senders: Vec<(SubscriptionId, Sender<Arc<PodSnapshot>>)>,
}

impl Subscribers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> Subscription {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        let (tx, rx) = unbounded();
        self.senders.push((id, tx));
        log::debug!(target: "fanout", "subscriber {:?} registered", id);
        Subscription { id, receiver: rx }
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.senders.len();
        self.senders.retain(|(sid, _)| *sid != id);
        before != self.senders.len()
    }

    /// Deliver `snapshot` to every live subscriber. Subscribers whose
    /// receiver was dropped are removed.
    pub fn publish(&mut self, snapshot: &Arc<PodSnapshot>) {
        self.senders.retain(|(id, tx)| {
            let alive = tx.send(Arc::clone(snapshot)).is_ok();
            if !alive {
                log::debug!(target: "fanout", "subscriber {:?} dropped", id);
            }
            alive
        });
    }

    pub fn len(&self) -> usize {
        self.senders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.senders.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(revision: u64) -> Arc<PodSnapshot> {
        Arc::new(PodSnapshot {
            revision,
            ..Default::default()
        })
    }

    #[test]
    fn delivers_in_publish_order() {
        let mut subs = Subscribers::new();
        let a = subs.subscribe();
        let b = subs.subscribe();
        for r in 1..=3 {
            subs.publish(&snap(r));
        }
        let revs: Vec<u64> = a.drain().iter().map(|s| s.revision).collect();
        assert_eq!(revs, vec![1, 2, 3]);
        assert_eq!(b.latest().map(|s| s.revision), Some(3));
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let mut subs = Subscribers::new();
        let a = subs.subscribe();
        assert!(subs.unsubscribe(a.id));
        assert!(!subs.unsubscribe(a.id));
        subs.publish(&snap(1));
        assert!(a.drain().is_empty());
    }

    #[test]
    fn dropped_receivers_are_pruned() {
        let mut subs = Subscribers::new();
        let a = subs.subscribe();
        let _b = subs.subscribe();
        drop(a);
        subs.publish(&snap(1));
        assert_eq!(subs.len(), 1);
    }

    #[test]
    fn subscribers_share_the_same_snapshot() {
        let mut subs = Subscribers::new();
        let a = subs.subscribe();
        let b = subs.subscribe();
        let s = snap(7);
        subs.publish(&s);
        let from_a = a.latest().unwrap();
        let from_b = b.latest().unwrap();
        assert!(Arc::ptr_eq(&from_a, &s));
        assert!(Arc::ptr_eq(&from_b, &s));
    }
}
