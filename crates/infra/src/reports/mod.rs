//! Report assemblers: fetch an account's inputs, run the valuation engine,
//! render the result and hand it to the mailer.

pub mod assembler;
pub mod delivery_log;
pub mod mailer;
pub mod render;

use core::str::FromStr;

use serde::{Deserialize, Serialize};

pub use assembler::{RecipientSendFailed, ReportAssembler, ReportError, ReportOutcome};
pub use delivery_log::{DeliveryLog, DeliveryLogEntry, InMemoryDeliveryLog};
pub use mailer::{InMemoryMailer, ReportMailer, SendError, TracingMailer};
pub use render::RenderedReport;

/// Which report to produce.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    /// Valuation with low/out status.
    Stock,
    /// Valuation with critical tier, reorder quantities and stockout estimates.
    SupplyChain,
}

impl ReportKind {
    pub const ALL: [ReportKind; 2] = [ReportKind::Stock, ReportKind::SupplyChain];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Stock => "stock",
            ReportKind::SupplyChain => "supply_chain",
        }
    }
}

impl core::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "stock" => Ok(ReportKind::Stock),
            "supply_chain" | "supply-chain" => Ok(ReportKind::SupplyChain),
            other => Err(format!("unknown report kind: {other}")),
        }
    }
}
