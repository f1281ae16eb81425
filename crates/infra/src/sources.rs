//! Collaborator contracts the report assemblers read from.
//!
//! Implementations live behind these traits (in-memory for dev/tests,
//! database-backed in production). All calls are account-scoped.

use std::sync::Arc;

use tracing::debug;

use larder_core::{AccountId, CategoryId};
use larder_inventory::{Account, Category, Delivery, InventoryItem, InventorySnapshot, User};
use larder_reporting::CategoryResolver;

use crate::store::StoreError;

pub trait InventoryCatalog: Send + Sync {
    fn items_by_account(&self, account_id: AccountId) -> Result<Vec<InventoryItem>, StoreError>;
}

pub trait SnapshotStore: Send + Sync {
    /// Most recent stock count for the account, `None` if none was ever taken.
    fn latest_snapshot(&self, account_id: AccountId) -> Result<Option<InventorySnapshot>, StoreError>;
}

pub trait DeliveryLedger: Send + Sync {
    fn deliveries_by_account(&self, account_id: AccountId) -> Result<Vec<Delivery>, StoreError>;
}

pub trait CategoryDirectory: Send + Sync {
    fn category(&self, account_id: AccountId, category_id: CategoryId) -> Result<Option<Category>, StoreError>;
}

pub trait UserDirectory: Send + Sync {
    fn users_by_account(&self, account_id: AccountId) -> Result<Vec<User>, StoreError>;
}

pub trait AccountDirectory: Send + Sync {
    fn accounts(&self) -> Result<Vec<Account>, StoreError>;
}

/// Bundle of collaborators a report assembler needs.
#[derive(Clone)]
pub struct ReportSources {
    pub catalog: Arc<dyn InventoryCatalog>,
    pub snapshots: Arc<dyn SnapshotStore>,
    pub deliveries: Arc<dyn DeliveryLedger>,
    pub categories: Arc<dyn CategoryDirectory>,
    pub users: Arc<dyn UserDirectory>,
}

impl ReportSources {
    /// Use one backend for every collaborator.
    pub fn from_shared<B>(backend: Arc<B>) -> Self
    where
        B: InventoryCatalog + SnapshotStore + DeliveryLedger + CategoryDirectory + UserDirectory + 'static,
    {
        Self {
            catalog: backend.clone(),
            snapshots: backend.clone(),
            deliveries: backend.clone(),
            categories: backend.clone(),
            users: backend,
        }
    }
}

/// Adapts a `CategoryDirectory` to the engine's resolver for one account.
///
/// Lookup failures degrade to "no category" and are only logged.
pub struct AccountCategories<'a> {
    account_id: AccountId,
    directory: &'a dyn CategoryDirectory,
}

impl<'a> AccountCategories<'a> {
    pub fn new(account_id: AccountId, directory: &'a dyn CategoryDirectory) -> Self {
        Self { account_id, directory }
    }
}

impl CategoryResolver for AccountCategories<'_> {
    fn category_name(&self, category_id: CategoryId) -> Option<String> {
        match self.directory.category(self.account_id, category_id) {
            Ok(found) => found.map(|c| c.name),
            Err(e) => {
                debug!(account = %self.account_id, category = %category_id, error = %e, "category lookup failed");
                None
            }
        }
    }
}
