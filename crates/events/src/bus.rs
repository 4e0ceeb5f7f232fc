//! Notification publishing/subscription abstraction (mechanics only).
//!
//! Transport-agnostic pub/sub: works with in-memory channels, a message
//! queue, whatever the host wires in. Delivery is best-effort and
//! at-least-once acceptable; subscribers must tolerate duplicates, and an
//! implementation may shed messages to a subscriber that cannot keep up.
//! The bus is for distribution, not storage — the audit trail lives in the
//! store.

use std::sync::mpsc::Receiver;
use std::time::Duration;

/// A subscription to the notification stream.
///
/// Each subscription gets a copy of every message published to the bus
/// (broadcast semantics). Designed for single-threaded consumption.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Block until the next message is available.
    pub fn recv(&self) -> Result<M, std::sync::mpsc::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, std::sync::mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for a message.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<M, std::sync::mpsc::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }
}

/// Publish/subscribe contract for notification distribution.
pub trait NotificationBus<M>: Send + Sync {
    type Error: core::fmt::Debug;

    /// Publish a message to all current subscribers. Fire-and-forget: the
    /// engine does not wait for consumers.
    fn publish(&self, message: M) -> Result<(), Self::Error>;

    /// Open a new subscription receiving all messages published after this
    /// call.
    fn subscribe(&self) -> Subscription<M>;
}
