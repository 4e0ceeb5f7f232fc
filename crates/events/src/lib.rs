//! Outbound "stock changed" notifications.
//!
//! The engine publishes fire-and-forget notifications after every successful
//! mutation; downstream consumers (label printing, alerting) subscribe. No
//! acknowledgment flows back into the engine.

pub mod bus;
pub mod in_memory_bus;
pub mod notification;

pub use bus::{NotificationBus, Subscription};
pub use in_memory_bus::InMemoryNotificationBus;
pub use notification::{PriceUpdated, StockAdjusted, StockNotification};
