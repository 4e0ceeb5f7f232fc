//! Notification payloads emitted by the engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockledger_core::{Price, ProductId, Sku, VendorId, WarehouseId};

/// A stock line's quantity changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockAdjusted {
    pub product_id: ProductId,
    pub vendor_id: VendorId,
    pub warehouse_id: WarehouseId,
    pub sku: Sku,
    pub delta: i64,
    pub resulting_stock: i64,
    pub adjustment_id: u64,
    pub occurred_at: DateTime<Utc>,
}

/// A SKU's selling price was propagated across all of its lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceUpdated {
    pub sku: Sku,
    pub new_price: Price,
    pub affected_lines: usize,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockNotification {
    StockAdjusted(StockAdjusted),
    PriceUpdated(PriceUpdated),
}

impl StockNotification {
    pub fn notification_type(&self) -> &'static str {
        match self {
            StockNotification::StockAdjusted(_) => "stock.line.adjusted",
            StockNotification::PriceUpdated(_) => "stock.sku.price_updated",
        }
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            StockNotification::StockAdjusted(n) => n.occurred_at,
            StockNotification::PriceUpdated(n) => n.occurred_at,
        }
    }
}
