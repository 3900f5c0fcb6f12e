//! Synchronous message bus for ledger notifications.
//!
//! A simple pub/sub bus over std channels. Subscribers register per event
//! type and receive their own channel; publishing clones the event to every
//! registered sender. Publishing to a type with no subscribers is a no-op,
//! not an error.

use super::types::EventType;
use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors that can occur within the message bus.
#[derive(Error, Debug)]
pub enum MessageBusError {
    /// One or more subscriber channels rejected the event.
    #[error("Failed to send event: {reason}")]
    SendFailed { reason: String },
}

/// Result type for message bus operations.
pub type MessageBusResult<T> = Result<T, MessageBusError>;

/// Consumer handle for receiving events of a specific type.
pub struct Consumer<T: EventType> {
    receiver: Receiver<T>,
}

impl<T: EventType> Consumer<T> {
    /// Try to receive an event without blocking.
    pub fn try_recv(&mut self) -> Result<T, mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Receive an event, blocking until one is available.
    pub fn recv(&mut self) -> Result<T, mpsc::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive an event with a timeout.
    pub fn recv_timeout(&mut self, timeout: std::time::Duration) -> Result<T, mpsc::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Drain every event currently queued on this consumer.
    pub fn drain(&mut self) -> Vec<T> {
        let mut events = Vec::new();
        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }
        events
    }
}

/// Internal registry for managing event subscribers.
///
/// Senders for different event types are stored behind type erasure, keyed
/// by the event's `type_id`.
struct SubscriberRegistry {
    subscribers: HashMap<String, Vec<Box<dyn std::any::Any + Send>>>,
}

impl SubscriberRegistry {
    fn new() -> Self {
        Self {
            subscribers: HashMap::new(),
        }
    }

    fn add_subscriber<T: EventType>(&mut self, sender: Sender<T>) {
        self.subscribers
            .entry(T::type_id().to_string())
            .or_default()
            .push(Box::new(sender));
    }

    fn get_subscribers<T: EventType>(&self) -> Vec<&Sender<T>> {
        self.subscribers
            .get(T::type_id())
            .map(|senders| {
                senders
                    .iter()
                    .filter_map(|boxed| boxed.downcast_ref::<Sender<T>>())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Synchronous pub/sub bus carrying the ledger's notification events.
pub struct MessageBus {
    registry: Arc<Mutex<SubscriberRegistry>>,
}

impl MessageBus {
    /// Create a new message bus instance.
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(SubscriberRegistry::new())),
        }
    }

    /// Subscribe to events of a specific type.
    ///
    /// Returns a [`Consumer`] that receives every event of that type
    /// published after this call.
    pub fn subscribe<T: EventType>(&self) -> Consumer<T> {
        let (sender, receiver) = mpsc::channel();

        let mut registry = self.registry.lock().unwrap();
        registry.add_subscriber(sender);

        Consumer { receiver }
    }

    /// Publish an event to all subscribers of its type.
    pub fn publish<T: EventType>(&self, event: T) -> MessageBusResult<()> {
        let registry = self.registry.lock().unwrap();
        let subscribers = registry.get_subscribers::<T>();

        if subscribers.is_empty() {
            return Ok(());
        }

        let total_subscribers = subscribers.len();
        let mut failed_sends = 0;

        for subscriber in subscribers {
            if subscriber.send(event.clone()).is_err() {
                failed_sends += 1;
            }
        }

        if failed_sends > 0 {
            return Err(MessageBusError::SendFailed {
                reason: format!(
                    "{} of {} subscribers failed to receive event",
                    failed_sends, total_subscribers
                ),
            });
        }

        Ok(())
    }
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::types::ResourceCreated;
    use chrono::Utc;
    use uuid::Uuid;

    fn sample_event(resource_id: u64) -> ResourceCreated {
        ResourceCreated {
            event_id: Uuid::new_v4(),
            emitted_at: Utc::now(),
            resource_id,
            name: "payroll".to_string(),
            creator: "alice".to_string(),
        }
    }

    #[test]
    fn test_publish_without_subscribers_is_ok() {
        let bus = MessageBus::new();
        assert!(bus.publish(sample_event(1)).is_ok());
    }

    #[test]
    fn test_subscriber_receives_published_event() {
        let bus = MessageBus::new();
        let mut consumer = bus.subscribe::<ResourceCreated>();

        let event = sample_event(7);
        bus.publish(event.clone()).unwrap();

        let received = consumer.try_recv().unwrap();
        assert_eq!(received, event);
    }

    #[test]
    fn test_multiple_subscribers_each_receive_a_copy() {
        let bus = MessageBus::new();
        let mut first = bus.subscribe::<ResourceCreated>();
        let mut second = bus.subscribe::<ResourceCreated>();

        bus.publish(sample_event(3)).unwrap();

        assert_eq!(first.try_recv().unwrap().resource_id, 3);
        assert_eq!(second.try_recv().unwrap().resource_id, 3);
    }

    #[test]
    fn test_events_arrive_in_publish_order() {
        let bus = MessageBus::new();
        let mut consumer = bus.subscribe::<ResourceCreated>();

        for id in 1..=4 {
            bus.publish(sample_event(id)).unwrap();
        }

        let ids: Vec<u64> = consumer.drain().iter().map(|e| e.resource_id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }
}
