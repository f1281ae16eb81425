use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use larder_core::{AccountId, AccountScoped, DeliveryId, DomainError, DomainResult, Entity, InventoryItemId};

/// Vendor shipment receipt for a single inventory item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delivery {
    pub id: DeliveryId,
    pub account_id: AccountId,
    pub inventory_item_id: InventoryItemId,
    pub vendor: String,
    pub quantity: f64,
    pub delivered_at: DateTime<Utc>,
    pub cost: f64,
}

impl Delivery {
    pub fn new(
        id: DeliveryId,
        account_id: AccountId,
        inventory_item_id: InventoryItemId,
        quantity: f64,
        delivered_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if !quantity.is_finite() {
            return Err(DomainError::validation("quantity must be finite"));
        }
        Ok(Self {
            id,
            account_id,
            inventory_item_id,
            vendor: String::new(),
            quantity,
            delivered_at,
            cost: 0.0,
        })
    }

    pub fn with_vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = vendor.into();
        self
    }

    pub fn with_cost(mut self, cost: f64) -> DomainResult<Self> {
        if !cost.is_finite() || cost < 0.0 {
            return Err(DomainError::validation("cost must be a finite non-negative number"));
        }
        self.cost = cost;
        Ok(self)
    }
}

impl Entity for Delivery {
    type Id = DeliveryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl AccountScoped for Delivery {
    fn account_id(&self) -> AccountId {
        self.account_id
    }
}
