use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{
    account::{Account, AccountStatus},
    account_number::AccountNumber,
    card::Card,
    card_number::CardNumber,
    email::EmailAddress,
    user::User,
};

// Durable entity store port traits and errors.
//
// The durable store is the single source of truth for users, accounts and
// cards; its unique constraints are the authority on number/email
// uniqueness, existence probes are advisory.

#[derive(Debug, Error)]
pub enum EntityStoreError {
    #[error("Duplicate value for unique field")]
    Conflict,
    #[error("Entity not found")]
    NotFound,
    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

impl PartialEq for EntityStoreError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Conflict, Self::Conflict) => true,
            (Self::NotFound, Self::NotFound) => true,
            (Self::UnexpectedError(_), Self::UnexpectedError(_)) => true,
            _ => false,
        }
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn email_exists(&self, email: &EmailAddress) -> Result<bool, EntityStoreError>;
    async fn find_by_email(&self, email: &EmailAddress)
        -> Result<Option<User>, EntityStoreError>;
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn account_number_exists(
        &self,
        number: &AccountNumber,
    ) -> Result<bool, EntityStoreError>;
    async fn find_by_account_number(
        &self,
        number: &AccountNumber,
    ) -> Result<Option<Account>, EntityStoreError>;
    async fn find_by_owner(&self, user_id: Uuid) -> Result<Option<Account>, EntityStoreError>;
    async fn set_status(
        &self,
        account_id: Uuid,
        status: AccountStatus,
    ) -> Result<(), EntityStoreError>;
}

#[async_trait]
pub trait CardStore: Send + Sync {
    async fn card_number_exists(&self, number: &CardNumber) -> Result<bool, EntityStoreError>;
    async fn find_by_account(&self, account_id: Uuid) -> Result<Option<Card>, EntityStoreError>;
    async fn save_card(&self, card: &Card) -> Result<(), EntityStoreError>;
    async fn set_pin_hash(&self, card_id: Uuid, pin_hash: &str) -> Result<(), EntityStoreError>;
}

/// Atomic transaction boundary for provisioning.
///
/// All three rows are written in one transaction; a failure on any write
/// rolls back the others, so a registration never leaves an orphaned user
/// or account behind.
#[async_trait]
pub trait ProvisioningStore: Send + Sync {
    async fn persist_customer(
        &self,
        user: &User,
        account: &Account,
        card: &Card,
    ) -> Result<(), EntityStoreError>;
}
