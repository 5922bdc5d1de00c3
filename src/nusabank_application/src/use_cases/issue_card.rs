use nusabank_core::{Account, Card, CardStore, DEFAULT_BIN, EntityStoreError};

use crate::use_cases::allocate::{self, AllocationError};

/// Error types specific to the issue-card use case
#[derive(Debug, thiserror::Error)]
pub enum IssueCardError {
    #[error(transparent)]
    Allocation(#[from] AllocationError),
    #[error("Entity store error: {0}")]
    EntityStoreError(#[from] EntityStoreError),
}

/// Issue-card use case - allocates a card number and binds a default card
/// to an existing account.
pub struct IssueCardUseCase<C>
where
    C: CardStore,
{
    cards: C,
}

impl<C> IssueCardUseCase<C>
where
    C: CardStore,
{
    pub fn new(cards: C) -> Self {
        Self { cards }
    }

    /// Execute the issue-card use case
    ///
    /// # Returns
    /// The persisted card: debit, inactive, four-year validity, no PIN.
    #[tracing::instrument(name = "IssueCardUseCase::execute", skip_all)]
    pub async fn execute(&self, account: &Account) -> Result<Card, IssueCardError> {
        let card_number = allocate::next_card_number(&self.cards, DEFAULT_BIN).await?;
        let card = Card::new(card_number, account.id);

        self.cards.save_card(&card).await?;

        tracing::info!(card = %card.card_number, "card issued");
        Ok(card)
    }
}
