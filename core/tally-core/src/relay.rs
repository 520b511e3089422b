//! Thread-safe hand-off between the change watcher and the UI-thread poller.
//!
//! The relay is the only data shared across the thread boundary. Producers
//! never block on a slow consumer (unbounded push), and the consumer never
//! blocks waiting for producers (`drain_all` returns immediately).

use std::sync::mpsc::{self, Receiver, Sender};

/// Opaque "update requested" token.
///
/// Messages are a presence signal, not a counted work queue; the consumer
/// re-renders at most once per drain however many are pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayMessage;

/// Cloneable producer half, handed to the watcher thread.
#[derive(Debug, Clone)]
pub struct RelaySender {
    tx: Sender<RelayMessage>,
}

impl RelaySender {
    /// Enqueues one message without blocking.
    ///
    /// A push after the consumer half was dropped is silently discarded.
    pub fn push(&self, message: RelayMessage) {
        let _ = self.tx.send(message);
    }
}

/// FIFO, unbounded, multi-producer/single-consumer relay.
///
/// The consumer half lives on the UI thread.
#[derive(Debug)]
pub struct EventRelay {
    tx: Sender<RelayMessage>,
    rx: Receiver<RelayMessage>,
}

impl EventRelay {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }

    /// Returns a producer handle for use on another thread.
    pub fn sender(&self) -> RelaySender {
        RelaySender {
            tx: self.tx.clone(),
        }
    }

    /// Removes and returns every currently queued message without blocking.
    ///
    /// Messages pushed while a drain is in progress may land in this drain
    /// or the next one; each message is returned exactly once.
    pub fn drain_all(&self) -> Vec<RelayMessage> {
        let mut drained = Vec::new();
        while let Ok(message) = self.rx.try_recv() {
            drained.push(message);
        }
        drained
    }
}

impl Default for EventRelay {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_drain_empty_returns_immediately() {
        let relay = EventRelay::new();
        assert!(relay.drain_all().is_empty());
    }

    #[test]
    fn test_drain_returns_each_message_exactly_once() {
        let relay = EventRelay::new();
        let sender = relay.sender();

        for _ in 0..5 {
            sender.push(RelayMessage);
        }

        assert_eq!(relay.drain_all().len(), 5);
        assert!(relay.drain_all().is_empty());
    }

    #[test]
    fn test_cross_thread_push_is_visible_after_join() {
        let relay = EventRelay::new();
        let sender = relay.sender();

        let producer = thread::spawn(move || {
            for _ in 0..100 {
                sender.push(RelayMessage);
            }
        });
        producer.join().unwrap();

        assert_eq!(relay.drain_all().len(), 100);
    }

    #[test]
    fn test_push_after_consumer_dropped_is_discarded() {
        let relay = EventRelay::new();
        let sender = relay.sender();
        drop(relay);

        // Must not panic.
        sender.push(RelayMessage);
    }

    #[test]
    fn test_multiple_producers_interleave() {
        let relay = EventRelay::new();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let sender = relay.sender();
                thread::spawn(move || {
                    for _ in 0..25 {
                        sender.push(RelayMessage);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(relay.drain_all().len(), 100);
    }
}
