//! Collision-safe allocation of account and card numbers.
//!
//! Candidates are drawn from OS entropy and probed against the durable
//! store; the store's unique constraints remain the final authority, the
//! probe only keeps the expected number of insert retries at zero.

use nusabank_core::{
    AccountNumber, AccountStore, CardNumber, CardStore, EntityStoreError,
};

/// Retry cap for the generate-and-probe loop.
///
/// With ~9e9 possible account numbers and ~1e9 card-number bases the odds
/// of even one collision are negligible at any plausible scale, so hitting
/// this cap means either a broken randomness source or a near-exhausted
/// number space. Both deserve an error rather than a spinning loop.
pub const MAX_ALLOCATION_ATTEMPTS: u32 = 64;

#[derive(Debug, thiserror::Error)]
pub enum AllocationError {
    #[error("Entity store error: {0}")]
    EntityStoreError(#[from] EntityStoreError),
    #[error("No unused number found in {MAX_ALLOCATION_ATTEMPTS} attempts")]
    AttemptsExhausted,
}

/// Allocate an account number not currently present in the store.
#[tracing::instrument(name = "Allocate account number", skip_all)]
pub async fn next_account_number<A>(accounts: &A) -> Result<AccountNumber, AllocationError>
where
    A: AccountStore + ?Sized,
{
    for _ in 0..MAX_ALLOCATION_ATTEMPTS {
        let candidate = AccountNumber::random();
        if !accounts.account_number_exists(&candidate).await? {
            return Ok(candidate);
        }
        tracing::debug!("account number collision, regenerating");
    }
    Err(AllocationError::AttemptsExhausted)
}

/// Allocate a Luhn-valid card number with the given BIN, not currently
/// present in the store.
#[tracing::instrument(name = "Allocate card number", skip_all)]
pub async fn next_card_number<C>(cards: &C, bin: &str) -> Result<CardNumber, AllocationError>
where
    C: CardStore + ?Sized,
{
    for _ in 0..MAX_ALLOCATION_ATTEMPTS {
        let candidate = CardNumber::random(bin);
        if !cards.card_number_exists(&candidate).await? {
            return Ok(candidate);
        }
        tracing::debug!("card number collision, regenerating");
    }
    Err(AllocationError::AttemptsExhausted)
}
