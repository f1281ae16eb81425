//! Stock status policies.
//!
//! Two tiering policies share the same inputs (on-hand quantity and the
//! item's thresholds):
//! - stock report: `out` / `low` / `normal`
//! - supply-chain report: adds `critical` and reorder/stockout estimates

use serde::{Deserialize, Serialize};

/// Days-until-stockout value reported when no estimate applies.
pub const NO_STOCKOUT_ESTIMATE: u32 = 999;

/// Fraction of the minimum level at or below which supply is critical.
pub const CRITICAL_FRACTION: f64 = 0.5;

/// Days of cover the minimum level is assumed to represent.
pub const MIN_LEVEL_COVER_DAYS: f64 = 7.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockStatus {
    Normal,
    Low,
    Out,
}

impl StockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::Normal => "normal",
            StockStatus::Low => "low",
            StockStatus::Out => "out",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupplyStatus {
    Normal,
    Low,
    Critical,
    Out,
}

impl SupplyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SupplyStatus::Normal => "normal",
            SupplyStatus::Low => "low",
            SupplyStatus::Critical => "critical",
            SupplyStatus::Out => "out",
        }
    }
}

/// Stock-report tiering.
pub fn classify_stock(current_stock: f64, min_stock_level: f64) -> StockStatus {
    if current_stock <= 0.0 {
        StockStatus::Out
    } else if current_stock <= min_stock_level {
        StockStatus::Low
    } else {
        StockStatus::Normal
    }
}

/// Supply-chain outcome for one item.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SupplyPlan {
    pub status: SupplyStatus,
    pub reorder_quantity: f64,
    pub days_until_stockout: u32,
}

impl SupplyPlan {
    fn normal() -> Self {
        Self {
            status: SupplyStatus::Normal,
            reorder_quantity: 0.0,
            days_until_stockout: NO_STOCKOUT_ESTIMATE,
        }
    }
}

/// Supply-chain tiering, evaluated in order: out, critical, low, normal.
///
/// A zero minimum level disables reorder tracking for in-stock items: they
/// stay `normal` with no reorder and no stockout estimate. Empty stock is
/// still `out` and reorders up to the maximum level.
pub fn plan_supply(current_stock: f64, min_stock_level: f64, max_stock_level: f64) -> SupplyPlan {
    if current_stock <= 0.0 {
        return SupplyPlan {
            status: SupplyStatus::Out,
            reorder_quantity: max_stock_level,
            days_until_stockout: NO_STOCKOUT_ESTIMATE,
        };
    }

    if min_stock_level <= 0.0 {
        return SupplyPlan::normal();
    }

    let status = if current_stock <= min_stock_level * CRITICAL_FRACTION {
        SupplyStatus::Critical
    } else if current_stock <= min_stock_level {
        SupplyStatus::Low
    } else {
        return SupplyPlan::normal();
    };

    SupplyPlan {
        status,
        // Only reachable below max when min > max; never reorder a negative amount.
        reorder_quantity: (max_stock_level - current_stock).max(0.0),
        days_until_stockout: estimate_days_until_stockout(current_stock, min_stock_level),
    }
}

/// Rough cover estimate: treats the minimum level as one week of usage.
fn estimate_days_until_stockout(current_stock: f64, min_stock_level: f64) -> u32 {
    let daily_usage = min_stock_level / MIN_LEVEL_COVER_DAYS;
    // `as` saturates, so absurd ratios clamp rather than wrap.
    (current_stock / daily_usage).floor() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_stock_is_out_regardless_of_thresholds() {
        assert_eq!(classify_stock(0.0, 0.0), StockStatus::Out);
        assert_eq!(classify_stock(-2.0, 10.0), StockStatus::Out);

        let plan = plan_supply(0.0, 10.0, 50.0);
        assert_eq!(plan.status, SupplyStatus::Out);
        assert_eq!(plan.reorder_quantity, 50.0);
        assert_eq!(plan.days_until_stockout, NO_STOCKOUT_ESTIMATE);
    }

    #[test]
    fn stock_at_min_is_low() {
        assert_eq!(classify_stock(10.0, 10.0), StockStatus::Low);
        assert_eq!(classify_stock(10.5, 10.0), StockStatus::Normal);
    }

    #[test]
    fn half_of_min_is_critical() {
        let plan = plan_supply(5.0, 10.0, 50.0);
        assert_eq!(plan.status, SupplyStatus::Critical);
        assert_eq!(plan.reorder_quantity, 45.0);
        assert_eq!(plan.days_until_stockout, 3);
    }

    #[test]
    fn critical_item_estimates_stockout() {
        let plan = plan_supply(3.0, 10.0, 50.0);
        assert_eq!(plan.status, SupplyStatus::Critical);
        assert_eq!(plan.reorder_quantity, 47.0);
        assert_eq!(plan.days_until_stockout, 2);
    }

    #[test]
    fn low_item_reorders_up_to_max() {
        let plan = plan_supply(8.0, 10.0, 50.0);
        assert_eq!(plan.status, SupplyStatus::Low);
        assert_eq!(plan.reorder_quantity, 42.0);
        assert_eq!(plan.days_until_stockout, 5);
    }

    #[test]
    fn zero_min_level_skips_reorder_tracking() {
        let plan = plan_supply(0.25, 0.0, 40.0);
        assert_eq!(plan, SupplyPlan::normal());
    }

    #[test]
    fn min_above_max_never_reorders_negative_amounts() {
        let plan = plan_supply(8.0, 10.0, 5.0);
        assert_eq!(plan.status, SupplyStatus::Low);
        assert_eq!(plan.reorder_quantity, 0.0);
    }

    #[test]
    fn statuses_render_lowercase() {
        assert_eq!(SupplyStatus::Critical.as_str(), "critical");
        assert_eq!(StockStatus::Out.as_str(), "out");
    }
}
