//! Price Consistency Enforcer: conflict detection for SKU-wide selling
//! prices.
//!
//! Confirmation arbitrates divergence *among existing rows*. When all rows of
//! a SKU already agree on one value, moving them to a new value needs no
//! confirmation — there is nothing to arbitrate.

use serde::{Deserialize, Serialize};

use stockledger_core::{LedgerError, LedgerResult, Price, Sku};

use crate::stock_line::StockLine;

/// Outcome of an applied selling price update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceUpdate {
    pub sku: Sku,
    pub new_price: Price,
    pub affected_lines: usize,
}

/// Distinct selling prices across the given lines, sorted ascending.
pub fn distinct_prices(lines: &[StockLine]) -> Vec<Price> {
    let mut prices: Vec<Price> = lines.iter().map(|line| line.selling_price).collect();
    prices.sort();
    prices.dedup();
    prices
}

/// Decide whether a price update may proceed.
///
/// Divergent existing prices require `confirmed = true`; the resulting
/// `PriceConflict` carries the current values for the caller's second phase.
pub fn check_conflict(lines: &[StockLine], proposed: Price, confirmed: bool) -> LedgerResult<()> {
    let current = distinct_prices(lines);
    if current.len() <= 1 || confirmed {
        return Ok(());
    }
    Err(LedgerError::PriceConflict { current, proposed })
}
