/// Change notification between tracker instances sharing one store
///
/// A feed carries the full new raw value of every record another instance
/// wrote. Receivers replace their copy of that record wholesale; there is
/// no merge.

use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::storage::StorageKey;

/// One record written by another instance
#[derive(Debug, Clone, PartialEq)]
pub struct StorageEvent {
    pub key: StorageKey,
    /// `None` when the record was removed
    pub new_value: Option<String>,
}

impl StorageEvent {
    pub fn new(key: StorageKey, new_value: Option<String>) -> Self {
        Self { key, new_value }
    }
}

/// Source and sink of storage change notifications
///
/// `publish` announces a local write; `poll` drains the writes of other
/// instances observed since the previous poll. Implementations never
/// return an instance's own writes from `poll`.
pub trait ChangeFeed: Send {
    fn publish(&self, event: &StorageEvent);

    fn poll(&mut self) -> Vec<StorageEvent>;
}

/// Feed for a single-instance deployment
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSync;

impl ChangeFeed for NoSync {
    fn publish(&self, _event: &StorageEvent) {}

    fn poll(&mut self) -> Vec<StorageEvent> {
        Vec::new()
    }
}

#[derive(Debug, Clone)]
struct Envelope {
    origin: Uuid,
    event: StorageEvent,
}

/// In-process feed shared by every peer subscribed to one channel
pub struct BroadcastFeed {
    origin: Uuid,
    sender: broadcast::Sender<Envelope>,
    receiver: broadcast::Receiver<Envelope>,
}

impl BroadcastFeed {
    /// Open a new channel holding up to `capacity` undelivered events
    pub fn channel(capacity: usize) -> Self {
        let (sender, receiver) = broadcast::channel(capacity.max(1));
        Self {
            origin: Uuid::new_v4(),
            sender,
            receiver,
        }
    }

    /// A feed for another instance on the same channel
    ///
    /// The peer only sees events published after this call.
    pub fn subscribe_peer(&self) -> Self {
        Self {
            origin: Uuid::new_v4(),
            sender: self.sender.clone(),
            receiver: self.sender.subscribe(),
        }
    }
}

impl ChangeFeed for BroadcastFeed {
    fn publish(&self, event: &StorageEvent) {
        let envelope = Envelope {
            origin: self.origin,
            event: event.clone(),
        };
        if self.sender.send(envelope).is_err() {
            debug!("No subscribers for change to {}", event.key);
        }
    }

    fn poll(&mut self) -> Vec<StorageEvent> {
        let mut events = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(envelope) if envelope.origin == self.origin => continue,
                Ok(envelope) => events.push(envelope.event),
                Err(TryRecvError::Lagged(missed)) => {
                    warn!("Change feed lagged, {} events were dropped", missed);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal_event(value: &str) -> StorageEvent {
        StorageEvent::new(StorageKey::DailyGoal, Some(value.to_string()))
    }

    #[test]
    fn test_peers_receive_each_others_events() {
        let mut first = BroadcastFeed::channel(16);
        let mut second = first.subscribe_peer();

        first.publish(&goal_event("3"));
        second.publish(&goal_event("4"));

        assert_eq!(first.poll(), vec![goal_event("4")]);
        assert_eq!(second.poll(), vec![goal_event("3")]);
        assert!(first.poll().is_empty());
    }

    #[test]
    fn test_lagged_receiver_keeps_latest_events() {
        let first = BroadcastFeed::channel(2);
        let mut second = first.subscribe_peer();

        for goal in 1..=5 {
            first.publish(&goal_event(&goal.to_string()));
        }

        assert_eq!(second.poll(), vec![goal_event("4"), goal_event("5")]);
    }

    #[test]
    fn test_no_sync_is_silent() {
        let mut feed = NoSync;
        feed.publish(&goal_event("3"));
        assert!(feed.poll().is_empty());
    }
}
