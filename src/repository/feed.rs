//! Fan-out of repository change notifications

use super::RepositoryEvent;
use std::cell::RefCell;
use std::sync::mpsc::{self, Receiver, Sender};

/// Broadcasts [`RepositoryEvent`]s to every live subscriber
#[derive(Debug, Default)]
pub struct ChangeFeed {
    senders: RefCell<Vec<Sender<RepositoryEvent>>>,
}

impl ChangeFeed {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> Receiver<RepositoryEvent> {
        let (tx, rx) = mpsc::channel();
        self.senders.borrow_mut().push(tx);
        rx
    }

    /// Notify subscribers; receivers that were dropped are forgotten
    pub fn changed(&self, collection: &str) {
        let event = RepositoryEvent::Changed {
            collection: collection.to_string(),
        };
        self.senders
            .borrow_mut()
            .retain(|tx| tx.send(event.clone()).is_ok());
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.senders.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_subscriber_is_notified() {
        let feed = ChangeFeed::new();
        let a = feed.subscribe();
        let b = feed.subscribe();
        feed.changed("game");

        let expected = RepositoryEvent::Changed {
            collection: "game".to_string(),
        };
        assert_eq!(a.try_recv().unwrap(), expected);
        assert_eq!(b.try_recv().unwrap(), expected);
    }

    #[test]
    fn test_dropped_receivers_are_pruned() {
        let feed = ChangeFeed::new();
        let kept = feed.subscribe();
        drop(feed.subscribe());
        feed.changed("game");

        assert_eq!(feed.subscriber_count(), 1);
        assert!(kept.try_recv().is_ok());
    }
}
