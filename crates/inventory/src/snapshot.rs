use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use larder_core::{AccountId, AccountScoped, DomainError, DomainResult, Entity, InventoryItemId, SnapshotId};

/// Point-in-time stock count for an account.
///
/// Items missing from `counts` were not counted and read as zero on hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    pub id: SnapshotId,
    pub account_id: AccountId,
    pub taken_at: DateTime<Utc>,
    pub counts: HashMap<InventoryItemId, f64>,
}

impl InventorySnapshot {
    pub fn new(id: SnapshotId, account_id: AccountId, taken_at: DateTime<Utc>) -> Self {
        Self {
            id,
            account_id,
            taken_at,
            counts: HashMap::new(),
        }
    }

    /// Record the observed quantity for an item, replacing any earlier count.
    pub fn with_count(mut self, item_id: InventoryItemId, quantity: f64) -> DomainResult<Self> {
        if !quantity.is_finite() {
            return Err(DomainError::validation("quantity must be finite"));
        }
        self.counts.insert(item_id, quantity);
        Ok(self)
    }

    /// On-hand quantity for `item_id`, `0.0` when the item was not counted.
    pub fn quantity_of(&self, item_id: InventoryItemId) -> f64 {
        self.counts.get(&item_id).copied().unwrap_or(0.0)
    }
}

impl Entity for InventorySnapshot {
    type Id = SnapshotId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl AccountScoped for InventorySnapshot {
    fn account_id(&self) -> AccountId {
        self.account_id
    }
}
