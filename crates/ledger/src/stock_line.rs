//! StockLine: the authoritative quantity/pricing record for one
//! (product, vendor, warehouse) combination.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockledger_core::{LedgerError, LedgerResult, Price, ProductId, Sku, VendorId, WarehouseId};

/// Identity of a stock line.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct StockLineKey {
    pub product_id: ProductId,
    pub vendor_id: VendorId,
    pub warehouse_id: WarehouseId,
}

impl core::fmt::Display for StockLineKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.product_id, self.vendor_id, self.warehouse_id
        )
    }
}

/// One row of the stock ledger.
///
/// `quantity` may be negative only as the result of a confirmed override.
/// `selling_price` is logically owned at SKU granularity: every line sharing
/// a `sku` holds the same value at rest, as does `reorder_threshold`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLine {
    pub key: StockLineKey,
    pub sku: Sku,
    pub vendor_name: String,
    pub category: String,
    pub quantity: i64,
    pub reorder_threshold: i64,
    pub vendor_price: Price,
    pub selling_price: Price,
    pub created_at: DateTime<Utc>,
}

impl StockLine {
    pub fn is_low_stock(&self) -> bool {
        self.quantity < self.reorder_threshold
    }
}

/// Input for creating a stock line (first receipt or explicit creation).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStockLine {
    pub key: StockLineKey,
    pub sku: Sku,
    pub vendor_name: String,
    pub category: String,
    pub opening_quantity: i64,
    pub reorder_threshold: i64,
    pub vendor_price: Price,
    pub selling_price: Price,
}

impl NewStockLine {
    pub fn validate(&self) -> LedgerResult<()> {
        if self.vendor_name.trim().is_empty() {
            return Err(LedgerError::validation("vendor_name cannot be empty"));
        }
        if self.category.trim().is_empty() {
            return Err(LedgerError::validation("category cannot be empty"));
        }
        if self.reorder_threshold < 0 {
            return Err(LedgerError::validation(
                "reorder_threshold cannot be negative",
            ));
        }
        if self.opening_quantity < 0 {
            return Err(LedgerError::validation(
                "opening quantity cannot be negative",
            ));
        }
        Ok(())
    }

    pub fn into_line(self, created_at: DateTime<Utc>) -> LedgerResult<StockLine> {
        self.validate()?;
        Ok(StockLine {
            key: self.key,
            sku: self.sku,
            vendor_name: self.vendor_name,
            category: self.category,
            quantity: self.opening_quantity,
            reorder_threshold: self.reorder_threshold,
            vendor_price: self.vendor_price,
            selling_price: self.selling_price,
            created_at,
        })
    }
}

/// Read filter over stock lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockFilter {
    pub sku: Option<Sku>,
    pub category: Option<String>,
    pub low_stock_only: bool,
}

impl StockFilter {
    pub fn by_sku(sku: Sku) -> Self {
        Self {
            sku: Some(sku),
            ..Self::default()
        }
    }

    pub fn matches(&self, line: &StockLine) -> bool {
        if let Some(sku) = &self.sku {
            if &line.sku != sku {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if &line.category != category {
                return false;
            }
        }
        if self.low_stock_only && !line.is_low_stock() {
            return false;
        }
        true
    }
}
