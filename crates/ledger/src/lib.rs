//! Stock Ledger & Reconciliation Engine.
//!
//! Maintains authoritative on-hand quantities per (product, vendor,
//! warehouse), applies adjustments with an immutable audit trail, aggregates
//! SKU-sharing rows into a merged view, and enforces SKU-wide selling-price
//! consistency.
//!
//! Everything here is synchronous domain logic over a [`store::StockStore`];
//! transport, auth and persistence engines live outside this crate.

pub mod adjust;
pub mod engine;
pub mod history;
mod locks;
pub mod memory;
pub mod merge;
pub mod price;
pub mod stock_line;
pub mod store;

pub use adjust::{AdjustmentMode, AdjustmentRecord, AdjustmentRequest};
pub use engine::StockLedger;
pub use history::HistoryQuery;
pub use memory::InMemoryStockStore;
pub use merge::{MergedView, VendorQuantity, WarehouseQuantity, merge};
pub use price::PriceUpdate;
pub use stock_line::{NewStockLine, StockFilter, StockLine, StockLineKey};
pub use store::{AdjustmentCommit, StockStore, StoreError};
