use std::collections::HashSet;
use std::sync::Mutex;

use thiserror::Error;

use larder_core::UserId;
use larder_inventory::User;

use super::render::RenderedReport;

/// Outbound delivery of a rendered report to one recipient.
///
/// Transport and templating live behind this seam.
pub trait ReportMailer: Send + Sync {
    fn send(&self, recipient: &User, report: &RenderedReport) -> Result<(), SendError>;
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SendError {
    #[error("recipient rejected: {0}")]
    Rejected(String),

    #[error("transport failure: {0}")]
    Transport(String),
}

/// Outbox that records every sent report, for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryMailer {
    sent: Mutex<Vec<(UserId, String, RenderedReport)>>,
    rejected: HashSet<String>,
}

impl InMemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse delivery to `email`.
    pub fn with_rejected(mut self, email: impl Into<String>) -> Self {
        self.rejected.insert(email.into());
        self
    }

    /// `(user, email, report)` for every accepted send, in send order.
    pub fn sent(&self) -> Vec<(UserId, String, RenderedReport)> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl ReportMailer for InMemoryMailer {
    fn send(&self, recipient: &User, report: &RenderedReport) -> Result<(), SendError> {
        if self.rejected.contains(&recipient.email) {
            return Err(SendError::Rejected(recipient.email.clone()));
        }
        let mut sent = self
            .sent
            .lock()
            .map_err(|_| SendError::Transport("outbox lock poisoned".to_string()))?;
        sent.push((recipient.id, recipient.email.clone(), report.clone()));
        Ok(())
    }
}

/// Mailer that only logs each send; for dev runs without a mail transport.
#[derive(Debug, Default, Copy, Clone)]
pub struct TracingMailer;

impl ReportMailer for TracingMailer {
    fn send(&self, recipient: &User, report: &RenderedReport) -> Result<(), SendError> {
        tracing::info!(
            to = %recipient.email,
            from = %report.from,
            subject = %report.subject,
            body_len = report.body.len(),
            "report mail (not sent: log transport)"
        );
        Ok(())
    }
}
