//! Aggregator: per-SKU merged views over stock lines.
//!
//! Pure function — no I/O, no side effects, and output is identical for
//! identical input regardless of input ordering (ordered maps throughout).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use stockledger_core::{LedgerError, LedgerResult, Price, Sku, VendorId, WarehouseId};

use crate::stock_line::StockLine;

/// Display label when a SKU is stocked by more than one vendor.
pub const MULTIPLE_VENDORS_LABEL: &str = "Multiple Vendors";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorQuantity {
    pub vendor_id: VendorId,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarehouseQuantity {
    pub warehouse_id: WarehouseId,
    pub quantity: i64,
}

/// Read-only aggregation of all stock lines sharing one SKU.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedView {
    pub sku: Sku,
    /// The single vendor's name, or [`MULTIPLE_VENDORS_LABEL`].
    pub vendor_label: String,
    pub category: String,
    pub total_quantity: i64,
    /// One entry per distinct vendor, quantities summed across warehouses.
    pub vendors: Vec<VendorQuantity>,
    /// One entry per distinct warehouse, quantities summed across vendors.
    pub warehouses: Vec<WarehouseQuantity>,
    pub reorder_threshold: i64,
    pub selling_price: Price,
    pub low_stock: bool,
}

fn add_quantity(acc: i64, quantity: i64, sku: &Sku) -> LedgerResult<i64> {
    acc.checked_add(quantity).ok_or_else(|| {
        LedgerError::invalid_state(format!("sku {sku} quantity sum overflows"))
    })
}

#[derive(Debug)]
struct Group<'a> {
    vendors: BTreeMap<VendorId, i64>,
    warehouses: BTreeMap<WarehouseId, i64>,
    total_quantity: i64,
    vendor_name: &'a str,
    category: &'a str,
    reorder_threshold: i64,
    selling_price: Price,
}

/// Merge stock lines into one view per SKU.
///
/// SKU-wide invariants are validated on the way through: constituents of a
/// group must agree on `selling_price` and `reorder_threshold`. A violation
/// means the caller handed us torn state and yields `InvalidState`.
pub fn merge(lines: &[StockLine]) -> LedgerResult<Vec<MergedView>> {
    let mut groups: BTreeMap<&Sku, Group<'_>> = BTreeMap::new();

    for line in lines {
        let group = groups.entry(&line.sku).or_insert_with(|| Group {
            vendors: BTreeMap::new(),
            warehouses: BTreeMap::new(),
            total_quantity: 0,
            vendor_name: &line.vendor_name,
            category: &line.category,
            reorder_threshold: line.reorder_threshold,
            selling_price: line.selling_price,
        });

        if group.selling_price != line.selling_price {
            return Err(LedgerError::invalid_state(format!(
                "sku {} has divergent selling prices ({} vs {})",
                line.sku, group.selling_price, line.selling_price
            )));
        }
        if group.reorder_threshold != line.reorder_threshold {
            return Err(LedgerError::invalid_state(format!(
                "sku {} has divergent reorder thresholds ({} vs {})",
                line.sku, group.reorder_threshold, line.reorder_threshold
            )));
        }

        // Quantities can legally sit at i64 extremes (absolute adjustments
        // with an override), so the sums are checked.
        let vendor_quantity = group.vendors.entry(line.key.vendor_id).or_insert(0);
        *vendor_quantity = add_quantity(*vendor_quantity, line.quantity, &line.sku)?;
        let warehouse_quantity = group.warehouses.entry(line.key.warehouse_id).or_insert(0);
        *warehouse_quantity = add_quantity(*warehouse_quantity, line.quantity, &line.sku)?;
        group.total_quantity = add_quantity(group.total_quantity, line.quantity, &line.sku)?;

        // Keep label/category selection order-independent: smallest wins.
        if line.vendor_name.as_str() < group.vendor_name {
            group.vendor_name = &line.vendor_name;
        }
        if line.category.as_str() < group.category {
            group.category = &line.category;
        }
    }

    Ok(groups
        .into_iter()
        .map(|(sku, group)| {
            let vendor_label = if group.vendors.len() > 1 {
                MULTIPLE_VENDORS_LABEL.to_string()
            } else {
                group.vendor_name.to_string()
            };

            MergedView {
                sku: sku.clone(),
                vendor_label,
                category: group.category.to_string(),
                total_quantity: group.total_quantity,
                vendors: group
                    .vendors
                    .into_iter()
                    .map(|(vendor_id, quantity)| VendorQuantity {
                        vendor_id,
                        quantity,
                    })
                    .collect(),
                warehouses: group
                    .warehouses
                    .into_iter()
                    .map(|(warehouse_id, quantity)| WarehouseQuantity {
                        warehouse_id,
                        quantity,
                    })
                    .collect(),
                reorder_threshold: group.reorder_threshold,
                selling_price: group.selling_price,
                low_stock: group.total_quantity < group.reorder_threshold,
            }
        })
        .collect())
}
