//! Plain-text + JSON rendering of engine output.
//!
//! The body is what a mail template would print; `payload` carries the full
//! structured report for templating or archiving.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value as JsonValue};

use larder_inventory::Account;
use larder_reporting::{StockReport, StockStatus, SupplyChainReport, SupplyStatus};

use super::ReportKind;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedReport {
    pub kind: ReportKind,
    pub from: String,
    pub subject: String,
    pub body: String,
    pub payload: JsonValue,
}

fn format_date(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}

fn format_last_delivery(at: Option<DateTime<Utc>>) -> String {
    at.map(format_date).unwrap_or_else(|| "never".to_string())
}

pub fn render_stock(account: &Account, sender: &str, report: &StockReport) -> RenderedReport {
    let m = &report.metrics;
    let mut body = String::new();

    let _ = writeln!(body, "Stock report for {} ({})", account.name, format_date(m.report_date));
    let _ = writeln!(body, "Items: {}", m.total_items);
    let _ = writeln!(body, "Total value: {:.2}", m.total_value);
    let _ = writeln!(body, "Low stock: {}", m.low_stock_count);
    let _ = writeln!(body, "Out of stock: {}", m.out_of_stock_count);

    let attention: Vec<_> = report.attention_items().collect();
    if !attention.is_empty() {
        let _ = writeln!(body);
        let _ = writeln!(body, "Needs attention:");
        for r in attention {
            let marker = match r.status {
                StockStatus::Out => "OUT",
                StockStatus::Low => "LOW",
                StockStatus::Normal => "",
            };
            let _ = writeln!(
                body,
                "  [{marker}] {} ({}): {} on hand, min {}, vendor {}, last delivery {}",
                r.name,
                display_or_dash(&r.category),
                quantity(r.current_stock, &r.unit),
                r.min_stock_level,
                display_or_dash(&r.vendor),
                format_last_delivery(r.last_delivery),
            );
        }
    }

    RenderedReport {
        kind: ReportKind::Stock,
        from: sender.to_string(),
        subject: format!("Stock report: {} ({})", account.name, format_date(m.report_date)),
        body,
        payload: json!({
            "kind": ReportKind::Stock.as_str(),
            "account_id": account.id,
            "account_name": account.name,
            "metrics": m,
            "items": report.items,
        }),
    }
}

pub fn render_supply_chain(account: &Account, sender: &str, report: &SupplyChainReport) -> RenderedReport {
    let m = &report.metrics;
    let mut body = String::new();

    let _ = writeln!(body, "Supply chain report for {} ({})", account.name, format_date(m.report_date));
    let _ = writeln!(body, "Items: {}", m.total_items);
    let _ = writeln!(body, "Total value: {:.2}", m.total_value);
    let _ = writeln!(body, "Critical: {}", m.critical_count);
    let _ = writeln!(body, "Low stock: {}", m.low_stock_count);
    let _ = writeln!(body, "Out of stock: {}", m.out_of_stock_count);
    let _ = writeln!(body, "Estimated reorder cost: {:.2}", m.total_reorder_cost);

    let reorders: Vec<_> = report.reorder_items().collect();
    if !reorders.is_empty() {
        let _ = writeln!(body);
        let _ = writeln!(body, "Reorder:");
        for r in reorders {
            let cover = match r.status {
                SupplyStatus::Critical | SupplyStatus::Low => format!("~{} days left", r.days_until_stockout),
                SupplyStatus::Out => "out of stock".to_string(),
                SupplyStatus::Normal => String::new(),
            };
            let _ = writeln!(
                body,
                "  [{}] {}: order {} from {} ({:.2}), {}",
                r.status.as_str().to_uppercase(),
                r.name,
                quantity(r.reorder_quantity, &r.unit),
                display_or_dash(&r.vendor),
                r.reorder_cost,
                cover,
            );
        }
    }

    RenderedReport {
        kind: ReportKind::SupplyChain,
        from: sender.to_string(),
        subject: format!("Supply chain report: {} ({})", account.name, format_date(m.report_date)),
        body,
        payload: json!({
            "kind": ReportKind::SupplyChain.as_str(),
            "account_id": account.id,
            "account_name": account.name,
            "metrics": m,
            "items": report.items,
        }),
    }
}

fn quantity(amount: f64, unit: &str) -> String {
    if unit.is_empty() {
        amount.to_string()
    } else {
        format!("{amount} {unit}")
    }
}

fn display_or_dash(s: &str) -> &str {
    if s.is_empty() { "-" } else { s }
}
