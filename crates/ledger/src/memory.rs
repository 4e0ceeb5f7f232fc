//! In-memory stock store.
//!
//! Intended for tests/dev. A single `RwLock` guards lines and the adjustment
//! log together, so commit atomicity, bulk all-or-nothing writes and snapshot
//! isolation all fall out of the lock.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};

use stockledger_core::{ActorId, Price, Sku};

use crate::adjust::AdjustmentRecord;
use crate::stock_line::{StockFilter, StockLine, StockLineKey};
use crate::store::{AdjustmentCommit, StockStore, StoreError};

#[derive(Debug, Default)]
struct Inner {
    lines: HashMap<StockLineKey, StockLine>,
    adjustments: Vec<AdjustmentRecord>,
    next_adjustment_id: u64,
}

#[derive(Debug, Default)]
pub struct InMemoryStockStore {
    inner: RwLock<Inner>,
}

impl InMemoryStockStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> StoreError {
        StoreError::Backend("lock poisoned".to_string())
    }
}

impl StockStore for InMemoryStockStore {
    fn get(&self, key: &StockLineKey) -> Result<StockLine, StoreError> {
        let inner = self.inner.read().map_err(|_| Self::poisoned())?;
        inner.lines.get(key).cloned().ok_or(StoreError::NotFound)
    }

    fn list(&self, filter: &StockFilter) -> Result<Vec<StockLine>, StoreError> {
        let inner = self.inner.read().map_err(|_| Self::poisoned())?;
        let mut lines: Vec<StockLine> = inner
            .lines
            .values()
            .filter(|line| filter.matches(line))
            .cloned()
            .collect();
        lines.sort_by_key(|line| line.key);
        Ok(lines)
    }

    fn insert(&self, line: StockLine) -> Result<(), StoreError> {
        let mut inner = self.inner.write().map_err(|_| Self::poisoned())?;
        if inner.lines.contains_key(&line.key) {
            return Err(StoreError::Duplicate);
        }
        inner.lines.insert(line.key, line);
        Ok(())
    }

    fn commit_adjustment(
        &self,
        commit: AdjustmentCommit,
    ) -> Result<AdjustmentRecord, StoreError> {
        let mut inner = self.inner.write().map_err(|_| Self::poisoned())?;

        // Assign the record id before mutating; ids are monotonic in commit order.
        let id = inner.next_adjustment_id + 1;

        let line = inner
            .lines
            .get_mut(&commit.key)
            .ok_or(StoreError::NotFound)?;

        let previous = line.quantity;
        line.quantity = commit.final_quantity;

        let record = AdjustmentRecord {
            id,
            stock_line: commit.key,
            timestamp: commit.at,
            actor_id: commit.actor_id,
            delta: commit.final_quantity - previous,
            resulting_stock: commit.final_quantity,
            reason: commit.reason,
            note: commit.note,
            override_applied: commit.override_applied,
        };

        inner.next_adjustment_id = id;
        inner.adjustments.push(record.clone());

        Ok(record)
    }

    fn set_selling_price(&self, sku: &Sku, price: Price) -> Result<usize, StoreError> {
        let mut inner = self.inner.write().map_err(|_| Self::poisoned())?;

        // Check-all-then-apply-all under the write lock: a failure before the
        // apply phase leaves every row untouched.
        let keys: Vec<StockLineKey> = inner
            .lines
            .values()
            .filter(|line| &line.sku == sku)
            .map(|line| line.key)
            .collect();

        if keys.is_empty() {
            return Err(StoreError::NotFound);
        }

        for key in &keys {
            let line = inner.lines.get_mut(key).ok_or_else(|| {
                StoreError::InvalidWrite(format!("line {key} vanished during bulk price update"))
            })?;
            line.selling_price = price;
        }

        Ok(keys.len())
    }

    fn history(
        &self,
        key: &StockLineKey,
        since: DateTime<Utc>,
        actor: Option<ActorId>,
    ) -> Result<Vec<AdjustmentRecord>, StoreError> {
        let inner = self.inner.read().map_err(|_| Self::poisoned())?;
        let mut records: Vec<AdjustmentRecord> = inner
            .adjustments
            .iter()
            .filter(|r| r.stock_line == *key)
            .filter(|r| r.timestamp >= since)
            .filter(|r| actor.is_none_or(|a| r.actor_id == a))
            .cloned()
            .collect();

        // Newest first; ties on timestamp broken by id.
        records.sort_by(|a, b| (b.timestamp, b.id).cmp(&(a.timestamp, a.id)));
        Ok(records)
    }

    fn snapshot(&self, sku: Option<&Sku>) -> Result<Vec<StockLine>, StoreError> {
        let inner = self.inner.read().map_err(|_| Self::poisoned())?;
        let mut lines: Vec<StockLine> = inner
            .lines
            .values()
            .filter(|line| sku.is_none_or(|s| &line.sku == s))
            .cloned()
            .collect();
        lines.sort_by_key(|line| line.key);
        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockledger_core::{ProductId, VendorId, WarehouseId};

    fn test_line(sku: &str, quantity: i64) -> StockLine {
        StockLine {
            key: StockLineKey {
                product_id: ProductId::new(),
                vendor_id: VendorId::new(),
                warehouse_id: WarehouseId::new(),
            },
            sku: Sku::new(sku).unwrap(),
            vendor_name: "Acme Supply".to_string(),
            category: "Hardware".to_string(),
            quantity,
            reorder_threshold: 10,
            vendor_price: Price::from_minor(450),
            selling_price: Price::from_minor(999),
            created_at: Utc::now(),
        }
    }

    fn test_commit(key: StockLineKey, final_quantity: i64) -> AdjustmentCommit {
        AdjustmentCommit {
            key,
            final_quantity,
            actor_id: ActorId::new(),
            reason: "restock".to_string(),
            note: None,
            override_applied: false,
            at: Utc::now(),
        }
    }

    #[test]
    fn insert_then_get_roundtrips() {
        let store = InMemoryStockStore::new();
        let line = test_line("SKU-001", 50);
        store.insert(line.clone()).unwrap();
        assert_eq!(store.get(&line.key).unwrap(), line);
    }

    #[test]
    fn insert_rejects_duplicate_key() {
        let store = InMemoryStockStore::new();
        let line = test_line("SKU-001", 50);
        store.insert(line.clone()).unwrap();
        assert_eq!(store.insert(line).unwrap_err(), StoreError::Duplicate);
    }

    #[test]
    fn get_missing_is_not_found() {
        let store = InMemoryStockStore::new();
        let line = test_line("SKU-001", 0);
        assert_eq!(store.get(&line.key).unwrap_err(), StoreError::NotFound);
    }

    #[test]
    fn commit_writes_quantity_and_record_together() {
        let store = InMemoryStockStore::new();
        let line = test_line("SKU-001", 50);
        store.insert(line.clone()).unwrap();

        let record = store.commit_adjustment(test_commit(line.key, 70)).unwrap();

        assert_eq!(record.delta, 20);
        assert_eq!(record.resulting_stock, 70);
        assert_eq!(store.get(&line.key).unwrap().quantity, 70);

        let history = store
            .history(&line.key, Utc::now() - chrono::Duration::days(1), None)
            .unwrap();
        assert_eq!(history, vec![record]);
    }

    #[test]
    fn commit_ids_are_monotonic() {
        let store = InMemoryStockStore::new();
        let line = test_line("SKU-001", 0);
        store.insert(line.clone()).unwrap();

        let first = store.commit_adjustment(test_commit(line.key, 1)).unwrap();
        let second = store.commit_adjustment(test_commit(line.key, 2)).unwrap();
        assert!(second.id > first.id);
    }

    #[test]
    fn commit_on_missing_line_is_not_found() {
        let store = InMemoryStockStore::new();
        let line = test_line("SKU-001", 0);
        let err = store
            .commit_adjustment(test_commit(line.key, 1))
            .unwrap_err();
        assert_eq!(err, StoreError::NotFound);
    }

    #[test]
    fn set_selling_price_updates_all_lines_of_sku() {
        let store = InMemoryStockStore::new();
        let a = test_line("SKU-001", 10);
        let b = test_line("SKU-001", 20);
        let other = test_line("SKU-002", 30);
        store.insert(a.clone()).unwrap();
        store.insert(b.clone()).unwrap();
        store.insert(other.clone()).unwrap();

        let sku = Sku::new("SKU-001").unwrap();
        let affected = store
            .set_selling_price(&sku, Price::from_minor(1250))
            .unwrap();
        assert_eq!(affected, 2);

        assert_eq!(store.get(&a.key).unwrap().selling_price, Price::from_minor(1250));
        assert_eq!(store.get(&b.key).unwrap().selling_price, Price::from_minor(1250));
        assert_eq!(
            store.get(&other.key).unwrap().selling_price,
            Price::from_minor(999)
        );
    }

    #[test]
    fn set_selling_price_on_unknown_sku_is_not_found() {
        let store = InMemoryStockStore::new();
        let sku = Sku::new("MISSING").unwrap();
        let err = store
            .set_selling_price(&sku, Price::from_minor(1))
            .unwrap_err();
        assert_eq!(err, StoreError::NotFound);
    }

    #[test]
    fn history_filters_by_actor_and_orders_newest_first() {
        let store = InMemoryStockStore::new();
        let line = test_line("SKU-001", 0);
        store.insert(line.clone()).unwrap();

        let alice = ActorId::new();
        let bob = ActorId::new();

        let mut commit = test_commit(line.key, 1);
        commit.actor_id = alice;
        store.commit_adjustment(commit).unwrap();

        let mut commit = test_commit(line.key, 2);
        commit.actor_id = bob;
        store.commit_adjustment(commit).unwrap();

        let mut commit = test_commit(line.key, 3);
        commit.actor_id = alice;
        store.commit_adjustment(commit).unwrap();

        let since = Utc::now() - chrono::Duration::days(30);
        let all = store.history(&line.key, since, None).unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.windows(2).all(|w| w[0].id > w[1].id));

        let only_alice = store.history(&line.key, since, Some(alice)).unwrap();
        assert_eq!(only_alice.len(), 2);
        assert!(only_alice.iter().all(|r| r.actor_id == alice));
    }

    #[test]
    fn history_outside_window_is_empty_not_error() {
        let store = InMemoryStockStore::new();
        let line = test_line("SKU-001", 0);
        store.insert(line.clone()).unwrap();
        store.commit_adjustment(test_commit(line.key, 1)).unwrap();

        let future = Utc::now() + chrono::Duration::days(1);
        assert!(store.history(&line.key, future, None).unwrap().is_empty());
    }

    #[test]
    fn snapshot_filters_by_sku() {
        let store = InMemoryStockStore::new();
        store.insert(test_line("SKU-001", 1)).unwrap();
        store.insert(test_line("SKU-001", 2)).unwrap();
        store.insert(test_line("SKU-002", 3)).unwrap();

        let sku = Sku::new("SKU-001").unwrap();
        assert_eq!(store.snapshot(Some(&sku)).unwrap().len(), 2);
        assert_eq!(store.snapshot(None).unwrap().len(), 3);
    }
}
