//! `larder-reporting`
//!
//! **Responsibility:** inventory valuation and supply-chain metrics for one
//! account, derived from its catalog, latest stock count and delivery history.
//!
//! Everything here is a pure function of its inputs:
//! - no IO, no clock reads (the report date is passed in)
//! - inputs are borrowed and never mutated
//! - outputs are freshly allocated, so concurrent calls need no locking

pub mod lookup;
pub mod status;
pub mod stock;
pub mod supply_chain;


pub use lookup::{CategoryResolver, LastDeliveryIndex, NoCategories};
pub use status::{
    classify_stock, plan_supply, StockStatus, SupplyPlan, SupplyStatus, NO_STOCKOUT_ESTIMATE,
};
pub use stock::{compute_stock_report, StockItemRecord, StockMetrics, StockReport};
pub use supply_chain::{
    compute_supply_chain_report, SupplyChainItemRecord, SupplyChainMetrics, SupplyChainReport,
};
