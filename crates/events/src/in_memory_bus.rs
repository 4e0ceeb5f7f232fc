//! In-memory notification bus for tests/dev.

use std::sync::{Mutex, mpsc};

use thiserror::Error;

use crate::bus::{NotificationBus, Subscription};

/// Per-subscriber buffer before messages start getting shed.
const DEFAULT_CAPACITY: usize = 256;

#[derive(Debug, Error)]
pub enum InMemoryBusError {
    /// Publish failed due to internal lock poisoning.
    #[error("notification bus lock poisoned")]
    Poisoned,
}

/// In-memory pub/sub bus with bounded per-subscriber buffers.
///
/// Notifications are fire-and-forget: the adjustment/price-update path must
/// never stall behind a slow consumer (a wedged label printer, say). Each
/// subscriber gets a bounded channel; when its buffer is full the message is
/// shed for that subscriber only. Disconnected subscribers are dropped on
/// publish.
#[derive(Debug)]
pub struct InMemoryNotificationBus<M> {
    capacity: usize,
    subscribers: Mutex<Vec<mpsc::SyncSender<M>>>,
}

impl<M> InMemoryNotificationBus<M> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Bus with an explicit per-subscriber buffer size.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            subscribers: Mutex::new(Vec::new()),
        }
    }
}

impl<M> Default for InMemoryNotificationBus<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> NotificationBus<M> for InMemoryNotificationBus<M>
where
    M: Clone + Send + 'static,
{
    type Error = InMemoryBusError;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        let mut subs = self
            .subscribers
            .lock()
            .map_err(|_| InMemoryBusError::Poisoned)?;

        subs.retain(|tx| match tx.try_send(message.clone()) {
            Ok(()) => true,
            // Full buffer: shed this message for this subscriber, keep it
            // subscribed for later messages.
            Err(mpsc::TrySendError::Full(_)) => true,
            Err(mpsc::TrySendError::Disconnected(_)) => false,
        });

        Ok(())
    }

    fn subscribe(&self) -> Subscription<M> {
        let (tx, rx) = mpsc::sync_channel(self.capacity);

        // If the lock is poisoned, we still return a subscription;
        // it just won't receive messages until the process restarts.
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push(tx);
        }

        Subscription::new(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broadcast_reaches_every_subscriber() {
        let bus: InMemoryNotificationBus<u32> = InMemoryNotificationBus::new();
        let a = bus.subscribe();
        let b = bus.subscribe();

        bus.publish(7).unwrap();

        assert_eq!(a.try_recv().unwrap(), 7);
        assert_eq!(b.try_recv().unwrap(), 7);
    }

    #[test]
    fn dropped_subscriber_does_not_break_publish() {
        let bus: InMemoryNotificationBus<u32> = InMemoryNotificationBus::new();
        let a = bus.subscribe();
        drop(bus.subscribe());

        bus.publish(1).unwrap();
        bus.publish(2).unwrap();

        assert_eq!(a.try_recv().unwrap(), 1);
        assert_eq!(a.try_recv().unwrap(), 2);
    }

    #[test]
    fn subscription_sees_only_messages_after_subscribe() {
        let bus: InMemoryNotificationBus<u32> = InMemoryNotificationBus::new();
        bus.publish(1).unwrap();

        let late = bus.subscribe();
        bus.publish(2).unwrap();

        assert_eq!(late.try_recv().unwrap(), 2);
        assert!(late.try_recv().is_err());
    }

    #[test]
    fn slow_subscriber_sheds_overflow_without_blocking_publish() {
        let bus: InMemoryNotificationBus<u32> = InMemoryNotificationBus::with_capacity(1);
        let slow = bus.subscribe();

        // Second publish overflows the buffer; it must return immediately
        // rather than block on the unconsumed subscriber.
        bus.publish(1).unwrap();
        bus.publish(2).unwrap();

        assert_eq!(slow.try_recv().unwrap(), 1);
        assert!(slow.try_recv().is_err());

        // Still subscribed: later messages land once there is room again.
        bus.publish(3).unwrap();
        assert_eq!(slow.try_recv().unwrap(), 3);
    }
}
