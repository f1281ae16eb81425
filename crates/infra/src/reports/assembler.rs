use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use larder_core::{AccountId, Clock, UserId};
use larder_inventory::{Account, User};
use larder_reporting::{compute_stock_report, compute_supply_chain_report};

use super::delivery_log::{DeliveryLog, DeliveryLogEntry};
use super::mailer::{ReportMailer, SendError};
use super::render::{render_stock, render_supply_chain, RenderedReport};
use super::ReportKind;
use crate::sources::{AccountCategories, ReportSources};
use crate::store::StoreError;

/// Report generation failure for one account.
///
/// Each variant aborts only that account's report.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReportError {
    #[error("account {account_id} has no report recipients")]
    NoRecipients { account_id: AccountId },

    #[error("recipient directory unavailable for account {account_id}: {source}")]
    RecipientDirectoryUnavailable {
        account_id: AccountId,
        #[source]
        source: StoreError,
    },

    #[error("inventory catalog unavailable for account {account_id}: {source}")]
    CatalogUnavailable {
        account_id: AccountId,
        #[source]
        source: StoreError,
    },

    #[error("inventory snapshot unavailable for account {account_id}: {source}")]
    SnapshotUnavailable {
        account_id: AccountId,
        #[source]
        source: StoreError,
    },

    #[error("delivery ledger unavailable for account {account_id}: {source}")]
    DeliveryLedgerUnavailable {
        account_id: AccountId,
        #[source]
        source: StoreError,
    },
}

impl ReportError {
    pub fn account_id(&self) -> AccountId {
        match self {
            ReportError::NoRecipients { account_id }
            | ReportError::RecipientDirectoryUnavailable { account_id, .. }
            | ReportError::CatalogUnavailable { account_id, .. }
            | ReportError::SnapshotUnavailable { account_id, .. }
            | ReportError::DeliveryLedgerUnavailable { account_id, .. } => *account_id,
        }
    }
}

/// A send that failed for one recipient; the remaining recipients were still tried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientSendFailed {
    pub user_id: UserId,
    pub recipient: String,
    pub error: SendError,
}

/// Result of one report run for one account.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportOutcome {
    pub account_id: AccountId,
    pub kind: ReportKind,
    pub report: RenderedReport,
    pub delivered: Vec<UserId>,
    pub failures: Vec<RecipientSendFailed>,
}

impl ReportOutcome {
    pub fn fully_delivered(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Fetches an account's inputs, runs the engine and mails the result.
///
/// All IO happens before or after the engine call; the engine itself is pure.
/// No retries: a failed send is recorded in the outcome and the run moves on.
pub struct ReportAssembler {
    sources: ReportSources,
    mailer: Arc<dyn ReportMailer>,
    delivery_log: Arc<dyn DeliveryLog>,
    clock: Arc<dyn Clock>,
    sender: String,
}

impl ReportAssembler {
    pub fn new(
        sources: ReportSources,
        mailer: Arc<dyn ReportMailer>,
        delivery_log: Arc<dyn DeliveryLog>,
        clock: Arc<dyn Clock>,
        sender: impl Into<String>,
    ) -> Self {
        Self {
            sources,
            mailer,
            delivery_log,
            clock,
            sender: sender.into(),
        }
    }

    /// Build and send one report for `account`.
    pub fn assemble_and_send(&self, account: &Account, kind: ReportKind) -> Result<ReportOutcome, ReportError> {
        let account_id = account.id;

        let recipients = self
            .sources
            .users
            .users_by_account(account_id)
            .map_err(|source| ReportError::RecipientDirectoryUnavailable { account_id, source })?;
        if recipients.is_empty() {
            return Err(ReportError::NoRecipients { account_id });
        }

        let report = self.build(account, kind)?;
        let (delivered, failures) = self.dispatch(account_id, &recipients, &report);

        info!(
            account = %account_id,
            kind = %kind,
            delivered = delivered.len(),
            failed = failures.len(),
            "report sent"
        );

        Ok(ReportOutcome {
            account_id,
            kind,
            report,
            delivered,
            failures,
        })
    }

    /// Fetch inputs and render the report without sending it.
    pub fn build(&self, account: &Account, kind: ReportKind) -> Result<RenderedReport, ReportError> {
        let account_id = account.id;

        let items = self
            .sources
            .catalog
            .items_by_account(account_id)
            .map_err(|source| ReportError::CatalogUnavailable { account_id, source })?;

        let snapshot = self
            .sources
            .snapshots
            .latest_snapshot(account_id)
            .map_err(|source| ReportError::SnapshotUnavailable { account_id, source })?;
        if snapshot.is_none() {
            warn!(account = %account_id, "no inventory snapshot; reporting all items as zero stock");
        }

        let deliveries = self
            .sources
            .deliveries
            .deliveries_by_account(account_id)
            .map_err(|source| ReportError::DeliveryLedgerUnavailable { account_id, source })?;

        let categories = AccountCategories::new(account_id, &*self.sources.categories);
        let report_date = self.clock.now();

        let rendered = match kind {
            ReportKind::Stock => {
                let report = compute_stock_report(&items, snapshot.as_ref(), &deliveries, &categories, report_date);
                render_stock(account, &self.sender, &report)
            }
            ReportKind::SupplyChain => {
                let report =
                    compute_supply_chain_report(&items, snapshot.as_ref(), &deliveries, &categories, report_date);
                render_supply_chain(account, &self.sender, &report)
            }
        };
        Ok(rendered)
    }

    fn dispatch(
        &self,
        account_id: AccountId,
        recipients: &[User],
        report: &RenderedReport,
    ) -> (Vec<UserId>, Vec<RecipientSendFailed>) {
        let mut delivered = Vec::with_capacity(recipients.len());
        let mut failures = Vec::new();

        for user in recipients {
            match self.mailer.send(user, report) {
                Ok(()) => {
                    delivered.push(user.id);
                    let entry = DeliveryLogEntry::new(account_id, user.id, &user.email, report.kind, self.clock.now());
                    // Logging is best-effort; the report already went out.
                    if let Err(e) = self.delivery_log.record(entry) {
                        warn!(account = %account_id, user = %user.id, error = %e, "failed to record report delivery");
                    }
                }
                Err(error) => {
                    warn!(account = %account_id, user = %user.id, error = %error, "report send failed");
                    failures.push(RecipientSendFailed {
                        user_id: user.id,
                        recipient: user.email.clone(),
                        error,
                    });
                }
            }
        }

        (delivered, failures)
    }
}
