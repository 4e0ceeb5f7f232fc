//! Keyed critical sections.
//!
//! Two registries serialize engine mutations without a global lock:
//!
//! - one `Mutex` per stock line key: adjustments on the same line serialize,
//!   different lines proceed concurrently;
//! - one `RwLock` per sku: adjustments hold it shared, bulk price updates
//!   hold it exclusive, so a price update serializes against every mutation
//!   touching its sku.
//!
//! Lock order is always sku section first, then line section.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use stockledger_core::{LedgerError, LedgerResult, Sku};

use crate::stock_line::StockLineKey;

#[derive(Debug, Default)]
pub(crate) struct LineSections {
    inner: Mutex<HashMap<StockLineKey, Arc<Mutex<()>>>>,
}

impl LineSections {
    /// Handle to the critical section for one line. Callers lock the returned
    /// mutex for the duration of their read-modify-write.
    pub(crate) fn section(&self, key: StockLineKey) -> LedgerResult<Arc<Mutex<()>>> {
        let mut sections = self
            .inner
            .lock()
            .map_err(|_| LedgerError::concurrency("line section registry poisoned"))?;
        Ok(Arc::clone(sections.entry(key).or_default()))
    }
}

#[derive(Debug, Default)]
pub(crate) struct SkuSections {
    inner: Mutex<HashMap<Sku, Arc<RwLock<()>>>>,
}

impl SkuSections {
    /// Handle to the critical section for one sku. Adjustments take it with
    /// `read()`, bulk price updates with `write()`.
    pub(crate) fn section(&self, sku: &Sku) -> LedgerResult<Arc<RwLock<()>>> {
        let mut sections = self
            .inner
            .lock()
            .map_err(|_| LedgerError::concurrency("sku section registry poisoned"))?;
        Ok(Arc::clone(sections.entry(sku.clone()).or_default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockledger_core::{ProductId, VendorId, WarehouseId};

    fn test_key() -> StockLineKey {
        StockLineKey {
            product_id: ProductId::new(),
            vendor_id: VendorId::new(),
            warehouse_id: WarehouseId::new(),
        }
    }

    #[test]
    fn same_key_yields_the_same_section() {
        let sections = LineSections::default();
        let key = test_key();
        let a = sections.section(key).unwrap();
        let b = sections.section(key).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn different_keys_yield_independent_sections() {
        let sections = LineSections::default();
        let a = sections.section(test_key()).unwrap();
        let b = sections.section(test_key()).unwrap();
        assert!(!Arc::ptr_eq(&a, &b));

        // Holding one must not block the other.
        let _held = a.lock().unwrap();
        assert!(b.try_lock().is_ok());
    }

    #[test]
    fn sku_section_allows_concurrent_readers() {
        let sections = SkuSections::default();
        let sku = Sku::new("ABC").unwrap();
        let section = sections.section(&sku).unwrap();

        let first = section.read().unwrap();
        assert!(section.try_read().is_ok());
        drop(first);
    }

    #[test]
    fn sku_writer_excludes_readers() {
        let sections = SkuSections::default();
        let sku = Sku::new("ABC").unwrap();
        let section = sections.section(&sku).unwrap();

        let writer = section.write().unwrap();
        assert!(section.try_read().is_err());
        drop(writer);
        assert!(section.try_read().is_ok());
    }
}
