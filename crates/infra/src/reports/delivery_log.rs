use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use larder_core::{AccountId, UserId};

use super::ReportKind;
use crate::store::StoreError;

/// One successful report send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryLogEntry {
    pub id: Uuid,
    pub account_id: AccountId,
    pub user_id: UserId,
    pub recipient: String,
    pub kind: ReportKind,
    pub sent_at: DateTime<Utc>,
}

impl DeliveryLogEntry {
    pub fn new(
        account_id: AccountId,
        user_id: UserId,
        recipient: impl Into<String>,
        kind: ReportKind,
        sent_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            account_id,
            user_id,
            recipient: recipient.into(),
            kind,
            sent_at,
        }
    }
}

/// Sink for report delivery records.
pub trait DeliveryLog: Send + Sync {
    fn record(&self, entry: DeliveryLogEntry) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
pub struct InMemoryDeliveryLog {
    inner: Mutex<Vec<DeliveryLogEntry>>,
}

impl InMemoryDeliveryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<DeliveryLogEntry> {
        self.inner.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn for_account(&self, account_id: AccountId) -> Vec<DeliveryLogEntry> {
        self.all()
            .into_iter()
            .filter(|e| e.account_id == account_id)
            .collect()
    }
}

impl DeliveryLog for InMemoryDeliveryLog {
    fn record(&self, entry: DeliveryLogEntry) -> Result<(), StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Poisoned)?
            .push(entry);
        Ok(())
    }
}
