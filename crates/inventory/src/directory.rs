//! Account directory records: organizations, accounts, users, categories.

use serde::{Deserialize, Serialize};

use larder_core::{
    AccountId, AccountScoped, CategoryId, DomainError, DomainResult, Entity, OrganizationId, UserId,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: OrganizationId,
    pub name: String,
}

/// A single business location with its own inventory, users and menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub organization_id: OrganizationId,
    pub name: String,
}

/// Account member; every user of an account receives its reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub account_id: AccountId,
    pub name: String,
    pub email: String,
}

impl User {
    pub fn new(
        id: UserId,
        account_id: AccountId,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> DomainResult<Self> {
        let email = email.into();
        if !email.contains('@') {
            return Err(DomainError::validation("email must contain '@'"));
        }
        Ok(Self {
            id,
            account_id,
            name: name.into(),
            email,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub account_id: AccountId,
    pub name: String,
}

impl Entity for Account {
    type Id = AccountId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl AccountScoped for User {
    fn account_id(&self) -> AccountId {
        self.account_id
    }
}

impl Entity for Category {
    type Id = CategoryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl AccountScoped for Category {
    fn account_id(&self) -> AccountId {
        self.account_id
    }
}
