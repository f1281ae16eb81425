//! Stock report: valuation plus simple low/out status per item.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use larder_core::InventoryItemId;
use larder_inventory::{Delivery, InventoryItem, InventorySnapshot};

use crate::lookup::{resolve_category, CategoryResolver, LastDeliveryIndex};
use crate::status::{classify_stock, StockStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockItemRecord {
    pub item_id: InventoryItemId,
    pub name: String,
    pub category: String,
    pub current_stock: f64,
    pub min_stock_level: f64,
    pub max_stock_level: f64,
    pub unit: String,
    pub status: StockStatus,
    pub vendor: String,
    pub cost_per_unit: f64,
    /// `current_stock × cost_per_unit`.
    pub item_value: f64,
    pub last_delivery: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockMetrics {
    pub report_date: DateTime<Utc>,
    pub total_items: usize,
    pub total_value: f64,
    pub low_stock_count: usize,
    pub out_of_stock_count: usize,
    pub normal_count: usize,
}

impl StockMetrics {
    fn empty(report_date: DateTime<Utc>) -> Self {
        Self {
            report_date,
            total_items: 0,
            total_value: 0.0,
            low_stock_count: 0,
            out_of_stock_count: 0,
            normal_count: 0,
        }
    }

    fn record(&mut self, status: StockStatus, item_value: f64) {
        self.total_items += 1;
        self.total_value += item_value;
        match status {
            StockStatus::Out => self.out_of_stock_count += 1,
            StockStatus::Low => self.low_stock_count += 1,
            StockStatus::Normal => self.normal_count += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockReport {
    pub metrics: StockMetrics,
    /// One record per input item, in input order.
    pub items: Vec<StockItemRecord>,
}

impl StockReport {
    /// Items needing attention (`low` or `out`), in report order.
    pub fn attention_items(&self) -> impl Iterator<Item = &StockItemRecord> {
        self.items.iter().filter(|r| r.status != StockStatus::Normal)
    }
}

/// Value an account's inventory and flag low/out items.
///
/// Without a snapshot every item reads as zero on hand (all `out`).
pub fn compute_stock_report<R>(
    items: &[InventoryItem],
    snapshot: Option<&InventorySnapshot>,
    deliveries: &[Delivery],
    categories: &R,
    report_date: DateTime<Utc>,
) -> StockReport
where
    R: CategoryResolver + ?Sized,
{
    let last_deliveries = LastDeliveryIndex::build(deliveries);
    let mut metrics = StockMetrics::empty(report_date);
    let mut records = Vec::with_capacity(items.len());

    for item in items {
        let current_stock = snapshot.map_or(0.0, |s| s.quantity_of(item.id));
        let item_value = current_stock * item.cost_per_unit;
        let status = classify_stock(current_stock, item.min_stock_level);
        metrics.record(status, item_value);

        records.push(StockItemRecord {
            item_id: item.id,
            name: item.name.clone(),
            category: resolve_category(categories, item.category_id),
            current_stock,
            min_stock_level: item.min_stock_level,
            max_stock_level: item.max_stock_level,
            unit: item.unit.clone(),
            status,
            vendor: item.vendor.clone(),
            cost_per_unit: item.cost_per_unit,
            item_value,
            last_delivery: last_deliveries.last_delivery(item.id),
        });
    }

    StockReport {
        metrics,
        items: records,
    }
}
