//! JSON fixture loading for dev runs.
//!
//! Items, deliveries and users are read as plain records and rebuilt through
//! their validating constructors, so a fixture cannot smuggle in values the
//! domain would reject.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use larder_core::{AccountId, CategoryId, DeliveryId, DomainError, InventoryItemId, UserId};
use larder_inventory::{Account, Category, Delivery, InventoryItem, InventorySnapshot, User};

use super::{InMemoryRepository, StoreError};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SeedError {
    #[error("invalid {kind} {id}: {source}")]
    Invalid {
        kind: &'static str,
        id: u64,
        #[source]
        source: DomainError,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemRecord {
    pub id: InventoryItemId,
    pub account_id: AccountId,
    pub name: String,
    #[serde(default)]
    pub unit: String,
    pub cost_per_unit: f64,
    #[serde(default)]
    pub vendor: String,
    #[serde(default)]
    pub min_stock_level: f64,
    #[serde(default)]
    pub max_stock_level: f64,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
}

impl TryFrom<ItemRecord> for InventoryItem {
    type Error = DomainError;

    fn try_from(r: ItemRecord) -> Result<Self, Self::Error> {
        let item = InventoryItem::new(r.id, r.account_id, r.name, r.cost_per_unit)?
            .with_unit(r.unit)
            .with_vendor(r.vendor)
            .with_stock_levels(r.min_stock_level, r.max_stock_level)?;
        Ok(match r.category_id {
            Some(c) => item.with_category(c),
            None => item,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeliveryRecord {
    pub id: DeliveryId,
    pub account_id: AccountId,
    pub inventory_item_id: InventoryItemId,
    #[serde(default)]
    pub vendor: String,
    pub quantity: f64,
    pub delivered_at: DateTime<Utc>,
    #[serde(default)]
    pub cost: f64,
}

impl TryFrom<DeliveryRecord> for Delivery {
    type Error = DomainError;

    fn try_from(r: DeliveryRecord) -> Result<Self, Self::Error> {
        Delivery::new(r.id, r.account_id, r.inventory_item_id, r.quantity, r.delivered_at)?
            .with_vendor(r.vendor)
            .with_cost(r.cost)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub account_id: AccountId,
    pub name: String,
    pub email: String,
}

impl TryFrom<UserRecord> for User {
    type Error = DomainError;

    fn try_from(r: UserRecord) -> Result<Self, Self::Error> {
        User::new(r.id, r.account_id, r.name, r.email)
    }
}

/// Records to preload into an `InMemoryRepository`. Missing sections are empty.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Seed {
    pub accounts: Vec<Account>,
    pub users: Vec<UserRecord>,
    pub categories: Vec<Category>,
    pub items: Vec<ItemRecord>,
    pub snapshots: Vec<InventorySnapshot>,
    pub deliveries: Vec<DeliveryRecord>,
}

fn build<R, T>(kind: &'static str, id: u64, record: R) -> Result<T, SeedError>
where
    T: TryFrom<R, Error = DomainError>,
{
    T::try_from(record).map_err(|source| SeedError::Invalid { kind, id, source })
}

impl Seed {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Validate every record, then write them all. Nothing is written if any record is invalid.
    pub fn load_into(self, repo: &InMemoryRepository) -> Result<(), SeedError> {
        let users = self
            .users
            .into_iter()
            .map(|u| build::<_, User>("user", u.id.get(), u))
            .collect::<Result<Vec<_>, _>>()?;
        let items = self
            .items
            .into_iter()
            .map(|i| build::<_, InventoryItem>("item", i.id.get(), i))
            .collect::<Result<Vec<_>, _>>()?;
        let deliveries = self
            .deliveries
            .into_iter()
            .map(|d| build::<_, Delivery>("delivery", d.id.get(), d))
            .collect::<Result<Vec<_>, _>>()?;

        for a in self.accounts {
            repo.put_account(a)?;
        }
        for u in users {
            repo.put_user(u)?;
        }
        for c in self.categories {
            repo.put_category(c)?;
        }
        for i in items {
            repo.put_item(i)?;
        }
        for s in self.snapshots {
            repo.put_snapshot(s)?;
        }
        for d in deliveries {
            repo.put_delivery(d)?;
        }
        Ok(())
    }
}
