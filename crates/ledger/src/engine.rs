//! `StockLedger`: the engine facade.
//!
//! Wires the store, the keyed critical sections and the notification bus into
//! the public operations: line creation, adjustments, price updates, merged
//! views and history.

use chrono::Utc;

use stockledger_core::{LedgerError, LedgerResult, Price, Sku};
use stockledger_events::{
    InMemoryNotificationBus, NotificationBus, PriceUpdated, StockAdjusted, StockNotification,
    Subscription,
};

use crate::adjust::{AdjustmentRecord, AdjustmentRequest};
use crate::history::HistoryQuery;
use crate::locks::{LineSections, SkuSections};
use crate::memory::InMemoryStockStore;
use crate::merge::{MergedView, merge};
use crate::price::{PriceUpdate, check_conflict};
use crate::stock_line::{NewStockLine, StockFilter, StockLine, StockLineKey};
use crate::store::{AdjustmentCommit, StockStore, StoreError};

pub struct StockLedger<S, B>
where
    S: StockStore,
    B: NotificationBus<StockNotification>,
{
    store: S,
    bus: B,
    line_sections: LineSections,
    sku_sections: SkuSections,
}

impl StockLedger<InMemoryStockStore, InMemoryNotificationBus<StockNotification>> {
    /// Engine over the in-memory store and bus (tests/dev).
    pub fn in_memory() -> Self {
        Self::new(InMemoryStockStore::new(), InMemoryNotificationBus::new())
    }
}

impl<S, B> StockLedger<S, B>
where
    S: StockStore,
    B: NotificationBus<StockNotification>,
{
    pub fn new(store: S, bus: B) -> Self {
        Self {
            store,
            bus,
            line_sections: LineSections::default(),
            sku_sections: SkuSections::default(),
        }
    }

    /// Subscribe to outbound stock notifications.
    pub fn subscribe(&self) -> Subscription<StockNotification> {
        self.bus.subscribe()
    }

    pub fn get_line(&self, key: &StockLineKey) -> LedgerResult<StockLine> {
        Ok(self.store.get(key)?)
    }

    pub fn list_lines(&self, filter: &StockFilter) -> LedgerResult<Vec<StockLine>> {
        Ok(self.store.list(filter)?)
    }

    /// Create a stock line (first receipt or explicit creation).
    ///
    /// SKU-wide invariants are enforced at the door: the new line's selling
    /// price must match the sku's existing price (two-phase via
    /// `PriceConflict` otherwise) and its reorder threshold must match the
    /// sku's existing threshold.
    pub fn create_line(&self, input: NewStockLine) -> LedgerResult<StockLine> {
        let line = input.into_line(Utc::now())?;

        let sku_section = self.sku_sections.section(&line.sku)?;
        let _sku_guard = sku_section
            .write()
            .map_err(|_| LedgerError::concurrency("sku section poisoned"))?;

        let siblings = self.store.snapshot(Some(&line.sku))?;
        if let Some(existing) = siblings.first() {
            if existing.selling_price != line.selling_price {
                return Err(LedgerError::PriceConflict {
                    current: crate::price::distinct_prices(&siblings),
                    proposed: line.selling_price,
                });
            }
            if existing.reorder_threshold != line.reorder_threshold {
                return Err(LedgerError::validation(format!(
                    "reorder_threshold {} disagrees with sku {} (existing {})",
                    line.reorder_threshold, line.sku, existing.reorder_threshold
                )));
            }
        }

        self.store.insert(line.clone())?;
        tracing::info!(key = %line.key, sku = %line.sku, "stock line created");
        Ok(line)
    }

    /// Apply a quantity adjustment to exactly one stock line.
    ///
    /// Serialized per line; a concurrent call on the same key observes this
    /// call's completed effect. A negative computed result without
    /// `allow_negative` fails with `NegativeStock` and mutates nothing; the
    /// caller re-invokes with the explicit override to proceed.
    pub fn adjust(&self, request: AdjustmentRequest) -> LedgerResult<AdjustmentRecord> {
        request.validate()?;

        // First read only resolves the sku for lock acquisition; the
        // authoritative current quantity is re-read inside the sections.
        let line = self.store.get(&request.key)?;

        let sku_section = self.sku_sections.section(&line.sku)?;
        let line_section = self.line_sections.section(request.key)?;
        let _sku_guard = sku_section
            .read()
            .map_err(|_| LedgerError::concurrency("sku section poisoned"))?;
        let _line_guard = line_section
            .lock()
            .map_err(|_| LedgerError::concurrency("line section poisoned"))?;

        let current = self.store.get(&request.key).map_err(|e| match e {
            StoreError::NotFound => {
                LedgerError::invalid_state("stock line removed mid-adjustment")
            }
            other => other.into(),
        })?;

        let final_quantity = request.final_quantity(current.quantity)?;
        if final_quantity < 0 && !request.allow_negative {
            return Err(LedgerError::NegativeStock {
                computed: final_quantity,
            });
        }

        let record = self.store.commit_adjustment(AdjustmentCommit {
            key: request.key,
            final_quantity,
            actor_id: request.actor_id,
            reason: request.reason,
            note: request.note,
            override_applied: final_quantity < 0 && request.allow_negative,
            at: Utc::now(),
        })?;

        tracing::info!(
            line = %record.stock_line,
            delta = record.delta,
            resulting_stock = record.resulting_stock,
            "stock adjusted"
        );

        self.publish(StockNotification::StockAdjusted(StockAdjusted {
            product_id: request.key.product_id,
            vendor_id: request.key.vendor_id,
            warehouse_id: request.key.warehouse_id,
            sku: current.sku,
            delta: record.delta,
            resulting_stock: record.resulting_stock,
            adjustment_id: record.id,
            occurred_at: record.timestamp,
        }));

        Ok(record)
    }

    /// Propagate a selling price across every line of a sku.
    ///
    /// Divergent existing prices require `confirmed = true` (two-phase). The
    /// bulk write is all-or-nothing: on failure the pre-call state stands.
    pub fn update_selling_price(
        &self,
        sku: &Sku,
        new_price: Price,
        confirmed: bool,
    ) -> LedgerResult<PriceUpdate> {
        let sku_section = self.sku_sections.section(sku)?;
        let _sku_guard = sku_section
            .write()
            .map_err(|_| LedgerError::concurrency("sku section poisoned"))?;

        let lines = self.store.snapshot(Some(sku))?;
        if lines.is_empty() {
            return Err(LedgerError::not_found());
        }

        check_conflict(&lines, new_price, confirmed)?;

        let affected_lines = self.store.set_selling_price(sku, new_price)?;

        tracing::info!(%sku, price = %new_price, affected_lines, "selling price updated");

        let occurred_at = Utc::now();
        self.publish(StockNotification::PriceUpdated(PriceUpdated {
            sku: sku.clone(),
            new_price,
            affected_lines,
            occurred_at,
        }));

        Ok(PriceUpdate {
            sku: sku.clone(),
            new_price,
            affected_lines,
        })
    }

    /// Merged per-SKU views over a consistent snapshot of the store.
    pub fn merged_views(&self, sku_filter: Option<&Sku>) -> LedgerResult<Vec<MergedView>> {
        let lines = self.store.snapshot(sku_filter)?;
        merge(&lines)
    }

    /// Adjustment history for one line, newest first. An empty result is not
    /// an error.
    pub fn history(&self, query: &HistoryQuery) -> LedgerResult<Vec<AdjustmentRecord>> {
        query.validate()?;
        let cutoff = query.cutoff(Utc::now())?;
        Ok(self.store.history(&query.key, cutoff, query.actor)?)
    }

    /// Fire-and-forget notification publish; a bus failure never fails the
    /// mutation that produced it.
    fn publish(&self, notification: StockNotification) {
        if let Err(e) = self.bus.publish(notification) {
            tracing::warn!(error = ?e, "failed to publish stock notification");
        }
    }
}
