//! In-memory backend implementing every collaborator contract.

use std::collections::BTreeMap;
use std::sync::RwLock;

use larder_core::{AccountId, AccountScoped, CategoryId, DeliveryId, InventoryItemId, SnapshotId, UserId};
use larder_inventory::{Account, Category, Delivery, InventoryItem, InventorySnapshot, User};

use super::{AccountStore, InMemoryAccountStore, StoreError};
use crate::sources::{
    AccountDirectory, CategoryDirectory, DeliveryLedger, InventoryCatalog, SnapshotStore, UserDirectory,
};

/// In-memory records for dev/tests, partitioned by account.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    accounts: RwLock<BTreeMap<AccountId, Account>>,
    items: InMemoryAccountStore<InventoryItemId, InventoryItem>,
    snapshots: InMemoryAccountStore<SnapshotId, InventorySnapshot>,
    deliveries: InMemoryAccountStore<DeliveryId, Delivery>,
    categories: InMemoryAccountStore<CategoryId, Category>,
    users: InMemoryAccountStore<UserId, User>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_account(&self, account: Account) -> Result<(), StoreError> {
        let mut accounts = self.accounts.write().map_err(|_| StoreError::Poisoned)?;
        accounts.insert(account.id, account);
        Ok(())
    }

    pub fn put_item(&self, item: InventoryItem) -> Result<(), StoreError> {
        upsert_scoped(&self.items, item)
    }

    pub fn put_snapshot(&self, snapshot: InventorySnapshot) -> Result<(), StoreError> {
        upsert_scoped(&self.snapshots, snapshot)
    }

    pub fn put_delivery(&self, delivery: Delivery) -> Result<(), StoreError> {
        upsert_scoped(&self.deliveries, delivery)
    }

    pub fn put_category(&self, category: Category) -> Result<(), StoreError> {
        upsert_scoped(&self.categories, category)
    }

    pub fn put_user(&self, user: User) -> Result<(), StoreError> {
        upsert_scoped(&self.users, user)
    }
}

/// Store a record under its own account and id.
fn upsert_scoped<V>(store: &InMemoryAccountStore<V::Id, V>, value: V) -> Result<(), StoreError>
where
    V: AccountScoped + Clone + Send + Sync + 'static,
    V::Id: Ord + Send + Sync + 'static,
{
    let key = value.id().clone();
    store.upsert(value.account_id(), key, value)
}

impl InventoryCatalog for InMemoryRepository {
    fn items_by_account(&self, account_id: AccountId) -> Result<Vec<InventoryItem>, StoreError> {
        self.items.list(account_id)
    }
}

impl SnapshotStore for InMemoryRepository {
    fn latest_snapshot(&self, account_id: AccountId) -> Result<Option<InventorySnapshot>, StoreError> {
        // Same timestamp: the later-issued id wins.
        Ok(self
            .snapshots
            .list(account_id)?
            .into_iter()
            .max_by_key(|s| (s.taken_at, s.id)))
    }
}

impl DeliveryLedger for InMemoryRepository {
    fn deliveries_by_account(&self, account_id: AccountId) -> Result<Vec<Delivery>, StoreError> {
        self.deliveries.list(account_id)
    }
}

impl CategoryDirectory for InMemoryRepository {
    fn category(&self, account_id: AccountId, category_id: CategoryId) -> Result<Option<Category>, StoreError> {
        self.categories.get(account_id, &category_id)
    }
}

impl UserDirectory for InMemoryRepository {
    fn users_by_account(&self, account_id: AccountId) -> Result<Vec<User>, StoreError> {
        self.users.list(account_id)
    }
}

impl AccountDirectory for InMemoryRepository {
    fn accounts(&self) -> Result<Vec<Account>, StoreError> {
        let accounts = self.accounts.read().map_err(|_| StoreError::Poisoned)?;
        Ok(accounts.values().cloned().collect())
    }
}
