//! Stock store contract.
//!
//! The engine owns business rules; the store owns durable state. Any backend
//! (in-memory, SQL, ...) can sit behind this trait as long as it honors the
//! atomicity notes below.

use chrono::{DateTime, Utc};
use thiserror::Error;

use stockledger_core::{ActorId, LedgerError, Price, Sku};

use crate::adjust::AdjustmentRecord;
use crate::stock_line::{StockFilter, StockLine, StockLineKey};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("stock line not found")]
    NotFound,

    #[error("stock line already exists")]
    Duplicate,

    #[error("invalid write: {0}")]
    InvalidWrite(String),

    /// Backend unavailable or corrupted (e.g. poisoned lock, lost connection).
    #[error("store backend failure: {0}")]
    Backend(String),
}

impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => LedgerError::NotFound,
            StoreError::Duplicate => LedgerError::invalid_state("stock line already exists"),
            StoreError::InvalidWrite(msg) => LedgerError::invalid_state(msg),
            StoreError::Backend(msg) => LedgerError::persistence(msg),
        }
    }
}

/// A fully-decided adjustment, ready to be committed atomically.
///
/// The engine computes and validates the final quantity; the store persists
/// the new quantity and the audit record as one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjustmentCommit {
    pub key: StockLineKey,
    pub final_quantity: i64,
    pub actor_id: ActorId,
    pub reason: String,
    pub note: Option<String>,
    pub override_applied: bool,
    pub at: DateTime<Utc>,
}

/// Durable stock line + adjustment log storage.
///
/// Atomicity contract:
/// - [`commit_adjustment`](StockStore::commit_adjustment) writes the line's
///   new quantity and appends the [`AdjustmentRecord`] as a single unit — no
///   reader may observe one without the other.
/// - [`set_selling_price`](StockStore::set_selling_price) updates every line
///   of the sku or none.
/// - [`snapshot`](StockStore::snapshot) is a consistent point-in-time read;
///   it never interleaves a partially-applied bulk update.
pub trait StockStore: Send + Sync {
    fn get(&self, key: &StockLineKey) -> Result<StockLine, StoreError>;

    fn list(&self, filter: &StockFilter) -> Result<Vec<StockLine>, StoreError>;

    /// Insert a brand-new line. Fails with [`StoreError::Duplicate`] when the
    /// key already exists.
    fn insert(&self, line: StockLine) -> Result<(), StoreError>;

    /// Atomic read-modify-write: set the line's quantity to
    /// `commit.final_quantity`, compute `delta` against the previous value
    /// and append the audit record, all as one unit.
    fn commit_adjustment(&self, commit: AdjustmentCommit)
    -> Result<AdjustmentRecord, StoreError>;

    /// Atomic bulk update of `selling_price` across every line sharing `sku`.
    /// Returns the affected row count; [`StoreError::NotFound`] when the sku
    /// matches nothing.
    fn set_selling_price(&self, sku: &Sku, price: Price) -> Result<usize, StoreError>;

    /// Audit records for one line with `timestamp >= since`, optionally
    /// restricted to one actor, newest first (timestamp desc, id desc).
    fn history(
        &self,
        key: &StockLineKey,
        since: DateTime<Utc>,
        actor: Option<ActorId>,
    ) -> Result<Vec<AdjustmentRecord>, StoreError>;

    /// Consistent snapshot of all lines, optionally restricted to one sku.
    fn snapshot(&self, sku: Option<&Sku>) -> Result<Vec<StockLine>, StoreError>;
}
