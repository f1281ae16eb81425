//! Entity traits: identity + account ownership.

use crate::id::AccountId;

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

/// An entity that belongs to exactly one account.
///
/// Stores use this to keep records partitioned by account, so a lookup for
/// one account can never observe another account's rows.
pub trait AccountScoped: Entity {
    fn account_id(&self) -> AccountId;
}
