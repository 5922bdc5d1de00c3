use nusabank_core::{
    Account, CardStore, EntityStoreError, Pin, PinHasher, PinHasherError,
};

/// Error types specific to the set-PIN use case
#[derive(Debug, thiserror::Error)]
pub enum SetPinError {
    #[error("No card issued for account")]
    CardNotFound,
    #[error("Entity store error: {0}")]
    EntityStoreError(#[from] EntityStoreError),
    #[error("Hasher error: {0}")]
    PinHasherError(#[from] PinHasherError),
}

/// Set-PIN use case - hashes a chosen PIN and stores the digest on the
/// account's card. The plaintext never reaches storage.
pub struct SetPinUseCase<C, H>
where
    C: CardStore,
    H: PinHasher,
{
    cards: C,
    hasher: H,
}

impl<C, H> SetPinUseCase<C, H>
where
    C: CardStore,
    H: PinHasher,
{
    pub fn new(cards: C, hasher: H) -> Self {
        Self { cards, hasher }
    }

    #[tracing::instrument(name = "SetPinUseCase::execute", skip(self, pin))]
    pub async fn execute(&self, account: &Account, pin: &Pin) -> Result<(), SetPinError> {
        let card = self
            .cards
            .find_by_account(account.id)
            .await?
            .ok_or(SetPinError::CardNotFound)?;

        let digest = self.hasher.hash(pin).await?;
        self.cards.set_pin_hash(card.id, &digest).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use async_trait::async_trait;
    use nusabank_core::{AccountNumber, Card, CardNumber};
    use secrecy::Secret;
    use tokio::sync::RwLock;
    use uuid::Uuid;

    use super::*;

    #[derive(Default, Clone)]
    struct MockCardStore {
        cards: Arc<RwLock<HashMap<Uuid, Card>>>,
    }

    #[async_trait]
    impl CardStore for MockCardStore {
        async fn card_number_exists(
            &self,
            _number: &CardNumber,
        ) -> Result<bool, EntityStoreError> {
            unimplemented!()
        }

        async fn find_by_account(
            &self,
            account_id: Uuid,
        ) -> Result<Option<Card>, EntityStoreError> {
            Ok(self
                .cards
                .read()
                .await
                .values()
                .find(|c| c.account_id == account_id)
                .cloned())
        }

        async fn save_card(&self, card: &Card) -> Result<(), EntityStoreError> {
            self.cards.write().await.insert(card.id, card.clone());
            Ok(())
        }

        async fn set_pin_hash(
            &self,
            card_id: Uuid,
            pin_hash: &str,
        ) -> Result<(), EntityStoreError> {
            let mut cards = self.cards.write().await;
            let card = cards.get_mut(&card_id).ok_or(EntityStoreError::NotFound)?;
            card.pin_hash = Some(pin_hash.to_string());
            Ok(())
        }
    }

    // Trivial reversible "hasher" - good enough to observe the digest flow
    #[derive(Clone)]
    struct MockPinHasher;

    #[async_trait]
    impl PinHasher for MockPinHasher {
        async fn hash(&self, pin: &Pin) -> Result<String, PinHasherError> {
            Ok(format!("hashed:{}", pin.expose()))
        }

        async fn matches(&self, pin: &Pin, digest: &str) -> Result<bool, PinHasherError> {
            Ok(digest == format!("hashed:{}", pin.expose()))
        }
    }

    #[tokio::test]
    async fn stores_digest_not_plaintext() {
        let store = MockCardStore::default();
        let account = Account::new(AccountNumber::parse("1234567890").unwrap(), Uuid::new_v4());
        let card = Card::new(CardNumber::parse("4532015112830366").unwrap(), account.id);
        store.save_card(&card).await.unwrap();

        let pin = Pin::parse(Secret::from("123456".to_string())).unwrap();
        SetPinUseCase::new(store.clone(), MockPinHasher)
            .execute(&account, &pin)
            .await
            .unwrap();

        let stored = store.cards.read().await.get(&card.id).unwrap().clone();
        assert_eq!(stored.pin_hash.as_deref(), Some("hashed:123456"));
    }

    #[tokio::test]
    async fn missing_card_is_reported() {
        let store = MockCardStore::default();
        let account = Account::new(AccountNumber::parse("1234567890").unwrap(), Uuid::new_v4());
        let pin = Pin::parse(Secret::from("123456".to_string())).unwrap();

        let result = SetPinUseCase::new(store, MockPinHasher)
            .execute(&account, &pin)
            .await;

        assert!(matches!(result, Err(SetPinError::CardNotFound)));
    }
}
