use std::collections::BTreeMap;
use std::sync::RwLock;

use larder_core::AccountId;

use super::StoreError;

/// Account-isolated key/value store abstraction.
///
/// Every operation is keyed by account; there is no way to read across
/// accounts through this trait.
pub trait AccountStore<K, V>: Send + Sync {
    fn get(&self, account_id: AccountId, key: &K) -> Result<Option<V>, StoreError>;
    fn upsert(&self, account_id: AccountId, key: K, value: V) -> Result<(), StoreError>;
    /// All records for an account, ordered by key.
    fn list(&self, account_id: AccountId) -> Result<Vec<V>, StoreError>;
}

/// In-memory account-isolated store for tests/dev.
#[derive(Debug)]
pub struct InMemoryAccountStore<K, V> {
    inner: RwLock<BTreeMap<(AccountId, K), V>>,
}

impl<K, V> InMemoryAccountStore<K, V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(BTreeMap::new()),
        }
    }
}

impl<K, V> Default for InMemoryAccountStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> AccountStore<K, V> for InMemoryAccountStore<K, V>
where
    K: Clone + Ord + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn get(&self, account_id: AccountId, key: &K) -> Result<Option<V>, StoreError> {
        let map = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map.get(&(account_id, key.clone())).cloned())
    }

    fn upsert(&self, account_id: AccountId, key: K, value: V) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        map.insert((account_id, key), value);
        Ok(())
    }

    fn list(&self, account_id: AccountId) -> Result<Vec<V>, StoreError> {
        let map = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map
            .iter()
            .filter_map(|((a, _k), v)| if *a == account_id { Some(v.clone()) } else { None })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accounts_are_isolated() {
        let store = InMemoryAccountStore::<u64, &'static str>::new();
        let a = AccountId::new(1);
        let b = AccountId::new(2);

        store.upsert(a, 1, "a-one").unwrap();
        store.upsert(b, 1, "b-one").unwrap();

        assert_eq!(store.get(a, &1).unwrap(), Some("a-one"));
        assert_eq!(store.get(b, &1).unwrap(), Some("b-one"));
        assert_eq!(store.list(a).unwrap(), vec!["a-one"]);
        assert_eq!(store.list(b).unwrap(), vec!["b-one"]);
        assert_eq!(store.get(a, &2).unwrap(), None);
    }

    #[test]
    fn list_is_ordered_by_key() {
        let store = InMemoryAccountStore::<u64, u64>::new();
        let a = AccountId::new(1);
        for k in [30, 10, 20] {
            store.upsert(a, k, k * 10).unwrap();
        }
        assert_eq!(store.list(a).unwrap(), vec![100, 200, 300]);
    }
}
