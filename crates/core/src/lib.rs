//! `stockledger-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;
pub mod price;
pub mod sku;

pub use error::{LedgerError, LedgerResult};
pub use id::{ActorId, ProductId, VendorId, WarehouseId};
pub use price::Price;
pub use sku::Sku;
