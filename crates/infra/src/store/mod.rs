//! Account-isolated record storage.

pub mod account_store;
pub mod repository;
pub mod seed;

use thiserror::Error;

pub use account_store::{AccountStore, InMemoryAccountStore};
pub use repository::InMemoryRepository;
pub use seed::{Seed, SeedError};

/// Failure of a storage collaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing store could not be reached or refused the request.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A lock guarding in-memory state was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    Poisoned,
}

impl StoreError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}
