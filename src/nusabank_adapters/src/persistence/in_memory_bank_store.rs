use std::collections::HashMap;
use std::sync::Arc;

use nusabank_core::{
    Account, AccountNumber, AccountStatus, AccountStore, Card, CardNumber, CardStore,
    EmailAddress, EntityStoreError, ProvisioningStore, User, UserStore,
};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    accounts: HashMap<Uuid, Account>,
    cards: HashMap<Uuid, Card>,
}

/// In-memory entity store, for tests.
///
/// One lock over all three tables, so `persist_customer` is naturally
/// all-or-nothing and the duplicate checks inside it see a consistent
/// snapshot.
#[derive(Default, Clone)]
pub struct InMemoryBankStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryBankStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl UserStore for InMemoryBankStore {
    async fn email_exists(&self, email: &EmailAddress) -> Result<bool, EntityStoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().any(|u| &u.email == email))
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, EntityStoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| &u.email == email).cloned())
    }
}

#[async_trait::async_trait]
impl AccountStore for InMemoryBankStore {
    async fn account_number_exists(
        &self,
        number: &AccountNumber,
    ) -> Result<bool, EntityStoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .accounts
            .values()
            .any(|a| &a.account_number == number))
    }

    async fn find_by_account_number(
        &self,
        number: &AccountNumber,
    ) -> Result<Option<Account>, EntityStoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .accounts
            .values()
            .find(|a| &a.account_number == number)
            .cloned())
    }

    async fn find_by_owner(&self, user_id: Uuid) -> Result<Option<Account>, EntityStoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .accounts
            .values()
            .find(|a| a.owner_user_id == user_id)
            .cloned())
    }

    async fn set_status(
        &self,
        account_id: Uuid,
        status: AccountStatus,
    ) -> Result<(), EntityStoreError> {
        let mut tables = self.tables.write().await;
        let account = tables
            .accounts
            .get_mut(&account_id)
            .ok_or(EntityStoreError::NotFound)?;
        account.status = status;
        account.version += 1;
        account.updated_at = chrono::Utc::now();
        Ok(())
    }
}

#[async_trait::async_trait]
impl CardStore for InMemoryBankStore {
    async fn card_number_exists(&self, number: &CardNumber) -> Result<bool, EntityStoreError> {
        let tables = self.tables.read().await;
        Ok(tables.cards.values().any(|c| &c.card_number == number))
    }

    async fn find_by_account(&self, account_id: Uuid) -> Result<Option<Card>, EntityStoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .cards
            .values()
            .find(|c| c.account_id == account_id)
            .cloned())
    }

    async fn save_card(&self, card: &Card) -> Result<(), EntityStoreError> {
        let mut tables = self.tables.write().await;
        if tables
            .cards
            .values()
            .any(|c| c.card_number == card.card_number)
        {
            return Err(EntityStoreError::Conflict);
        }
        tables.cards.insert(card.id, card.clone());
        Ok(())
    }

    async fn set_pin_hash(&self, card_id: Uuid, pin_hash: &str) -> Result<(), EntityStoreError> {
        let mut tables = self.tables.write().await;
        let card = tables
            .cards
            .get_mut(&card_id)
            .ok_or(EntityStoreError::NotFound)?;
        card.pin_hash = Some(pin_hash.to_string());
        Ok(())
    }
}

#[async_trait::async_trait]
impl ProvisioningStore for InMemoryBankStore {
    async fn persist_customer(
        &self,
        user: &User,
        account: &Account,
        card: &Card,
    ) -> Result<(), EntityStoreError> {
        let mut tables = self.tables.write().await;

        let duplicate = tables.users.values().any(|u| {
            u.email == user.email || u.phone_number == user.phone_number
        }) || tables
            .accounts
            .values()
            .any(|a| a.account_number == account.account_number)
            || tables
                .cards
                .values()
                .any(|c| c.card_number == card.card_number);
        if duplicate {
            return Err(EntityStoreError::Conflict);
        }

        tables.users.insert(user.id, user.clone());
        tables.accounts.insert(account.id, account.clone());
        tables.cards.insert(card.id, card.clone());
        Ok(())
    }
}
