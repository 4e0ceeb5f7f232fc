//! Audit Log Reader: time-windowed, actor-filterable view over adjustment
//! records. Pure read path; never mutates.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use stockledger_core::{ActorId, LedgerError, LedgerResult};

use crate::stock_line::StockLineKey;

/// Query over one stock line's adjustment history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryQuery {
    pub key: StockLineKey,
    /// Window: records with `timestamp >= now - since_days` days.
    pub since_days: i64,
    pub actor: Option<ActorId>,
}

impl HistoryQuery {
    pub fn validate(&self) -> LedgerResult<()> {
        if self.since_days < 0 {
            return Err(LedgerError::validation("since_days cannot be negative"));
        }
        Ok(())
    }

    /// Start of the window. `since_days` comes straight off the inbound
    /// payload, so a window wider than the representable timeline is a
    /// validation failure, not a panic.
    pub fn cutoff(&self, now: DateTime<Utc>) -> LedgerResult<DateTime<Utc>> {
        Duration::try_days(self.since_days)
            .and_then(|window| now.checked_sub_signed(window))
            .ok_or_else(|| LedgerError::validation("since_days window is too large"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockledger_core::{ProductId, VendorId, WarehouseId};

    fn test_query(since_days: i64) -> HistoryQuery {
        HistoryQuery {
            key: StockLineKey {
                product_id: ProductId::new(),
                vendor_id: VendorId::new(),
                warehouse_id: WarehouseId::new(),
            },
            since_days,
            actor: None,
        }
    }

    #[test]
    fn cutoff_subtracts_whole_days() {
        let now = Utc::now();
        let query = test_query(30);
        assert_eq!(query.cutoff(now).unwrap(), now - Duration::days(30));
    }

    #[test]
    fn negative_window_is_rejected() {
        let err = test_query(-1).validate().unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
    }

    #[test]
    fn zero_window_is_allowed() {
        assert!(test_query(0).validate().is_ok());
    }

    #[test]
    fn window_past_duration_range_is_validation_error() {
        // Too wide for chrono::Duration itself.
        let err = test_query(i64::MAX).cutoff(Utc::now()).unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
    }

    #[test]
    fn window_past_timeline_start_is_validation_error() {
        // Representable as a Duration, but the subtraction leaves the
        // representable timeline.
        let err = test_query(1_000_000_000).cutoff(Utc::now()).unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
    }
}
