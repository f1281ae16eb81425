//! Supply-chain report: stricter tiering with reorder and stockout estimates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use larder_core::InventoryItemId;
use larder_inventory::{Delivery, InventoryItem, InventorySnapshot};

use crate::lookup::{resolve_category, CategoryResolver, LastDeliveryIndex};
use crate::status::{plan_supply, SupplyStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplyChainItemRecord {
    pub item_id: InventoryItemId,
    pub name: String,
    pub category: String,
    pub current_stock: f64,
    pub min_stock_level: f64,
    pub max_stock_level: f64,
    pub unit: String,
    pub status: SupplyStatus,
    pub vendor: String,
    pub cost_per_unit: f64,
    pub item_value: f64,
    pub reorder_quantity: f64,
    /// `reorder_quantity × cost_per_unit`.
    pub reorder_cost: f64,
    /// `NO_STOCKOUT_ESTIMATE` when no estimate applies.
    pub days_until_stockout: u32,
    pub last_delivery: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplyChainMetrics {
    pub report_date: DateTime<Utc>,
    pub total_items: usize,
    pub total_value: f64,
    pub low_stock_count: usize,
    pub out_of_stock_count: usize,
    pub critical_count: usize,
    pub normal_count: usize,
    pub total_reorder_cost: f64,
}

impl SupplyChainMetrics {
    fn empty(report_date: DateTime<Utc>) -> Self {
        Self {
            report_date,
            total_items: 0,
            total_value: 0.0,
            low_stock_count: 0,
            out_of_stock_count: 0,
            critical_count: 0,
            normal_count: 0,
            total_reorder_cost: 0.0,
        }
    }

    fn record(&mut self, record: &SupplyChainItemRecord) {
        self.total_items += 1;
        self.total_value += record.item_value;
        self.total_reorder_cost += record.reorder_cost;
        match record.status {
            SupplyStatus::Out => self.out_of_stock_count += 1,
            SupplyStatus::Critical => self.critical_count += 1,
            SupplyStatus::Low => self.low_stock_count += 1,
            SupplyStatus::Normal => self.normal_count += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplyChainReport {
    pub metrics: SupplyChainMetrics,
    /// One record per input item, in input order.
    pub items: Vec<SupplyChainItemRecord>,
}

impl SupplyChainReport {
    /// Items with a non-zero reorder quantity, in report order.
    pub fn reorder_items(&self) -> impl Iterator<Item = &SupplyChainItemRecord> {
        self.items.iter().filter(|r| r.reorder_quantity > 0.0)
    }
}

/// Value an account's inventory and plan reorders.
///
/// Without a snapshot every item reads as zero on hand (all `out`, each
/// reordering up to its max level).
pub fn compute_supply_chain_report<R>(
    items: &[InventoryItem],
    snapshot: Option<&InventorySnapshot>,
    deliveries: &[Delivery],
    categories: &R,
    report_date: DateTime<Utc>,
) -> SupplyChainReport
where
    R: CategoryResolver + ?Sized,
{
    let last_deliveries = LastDeliveryIndex::build(deliveries);
    let mut metrics = SupplyChainMetrics::empty(report_date);
    let mut records = Vec::with_capacity(items.len());

    for item in items {
        let current_stock = snapshot.map_or(0.0, |s| s.quantity_of(item.id));
        let plan = plan_supply(current_stock, item.min_stock_level, item.max_stock_level);

        let record = SupplyChainItemRecord {
            item_id: item.id,
            name: item.name.clone(),
            category: resolve_category(categories, item.category_id),
            current_stock,
            min_stock_level: item.min_stock_level,
            max_stock_level: item.max_stock_level,
            unit: item.unit.clone(),
            status: plan.status,
            vendor: item.vendor.clone(),
            cost_per_unit: item.cost_per_unit,
            item_value: current_stock * item.cost_per_unit,
            reorder_quantity: plan.reorder_quantity,
            reorder_cost: plan.reorder_quantity * item.cost_per_unit,
            days_until_stockout: plan.days_until_stockout,
            last_delivery: last_deliveries.last_delivery(item.id),
        };
        metrics.record(&record);
        records.push(record);
    }

    SupplyChainReport {
        metrics,
        items: records,
    }
}
