//! Adjustment Processor types: validated quantity changes against exactly one
//! stock line, each producing one immutable audit record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockledger_core::{ActorId, LedgerError, LedgerResult};

use crate::stock_line::StockLineKey;

/// How `quantity` combines with the current stock.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentMode {
    /// Final quantity = current + input.
    Relative,
    /// Final quantity = input.
    Absolute,
}

/// A request to change one stock line's quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustmentRequest {
    pub key: StockLineKey,
    pub mode: AdjustmentMode,
    pub quantity: i64,
    pub actor_id: ActorId,
    pub reason: String,
    pub note: Option<String>,
    /// Explicit override allowing a negative final quantity. The override is
    /// recorded on the resulting [`AdjustmentRecord`].
    pub allow_negative: bool,
}

impl AdjustmentRequest {
    /// Input validation. Runs before any state is touched.
    pub fn validate(&self) -> LedgerResult<()> {
        if self.reason.trim().is_empty() {
            return Err(LedgerError::validation("reason cannot be empty"));
        }
        Ok(())
    }

    /// Compute the final quantity from the current stock.
    ///
    /// Overflow of `current + quantity` is rejected as validation failure.
    pub fn final_quantity(&self, current: i64) -> LedgerResult<i64> {
        match self.mode {
            AdjustmentMode::Relative => current.checked_add(self.quantity).ok_or_else(|| {
                LedgerError::validation("adjustment overflows stock quantity range")
            }),
            AdjustmentMode::Absolute => Ok(self.quantity),
        }
    }
}

/// Immutable audit record of one applied adjustment.
///
/// Append-only; `id` is assigned monotonically by the store inside the same
/// atomic commit that writes the new quantity. Ordering is by timestamp, ties
/// broken by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustmentRecord {
    pub id: u64,
    pub stock_line: StockLineKey,
    pub timestamp: DateTime<Utc>,
    pub actor_id: ActorId,
    pub delta: i64,
    pub resulting_stock: i64,
    pub reason: String,
    pub note: Option<String>,
    /// True when the caller had to pass `allow_negative` for this adjustment.
    pub override_applied: bool,
}
