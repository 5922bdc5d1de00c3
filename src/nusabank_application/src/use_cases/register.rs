use nusabank_core::{
    Account, AccountStore, Card, CardStore, DEFAULT_BIN, EmailAddress, EntityStoreError,
    PhoneNumber, ProvisioningStore, User, UserStore,
};

use crate::use_cases::allocate::{self, AllocationError};

/// Error types specific to the register use case
#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    #[error("Email is already registered")]
    EmailTaken,
    #[error(transparent)]
    Allocation(#[from] AllocationError),
    #[error("Entity store error: {0}")]
    EntityStoreError(#[from] EntityStoreError),
}

/// Register use case - provisions a full banking identity.
///
/// Creates the user, one account and one card as a single logical unit;
/// the three writes go through [`ProvisioningStore::persist_customer`]
/// inside one transaction, so a failure on any write leaves nothing
/// behind.
pub struct RegisterUseCase<U, A, C, P>
where
    U: UserStore,
    A: AccountStore,
    C: CardStore,
    P: ProvisioningStore,
{
    users: U,
    accounts: A,
    cards: C,
    provisioning: P,
}

impl<U, A, C, P> RegisterUseCase<U, A, C, P>
where
    U: UserStore,
    A: AccountStore,
    C: CardStore,
    P: ProvisioningStore,
{
    pub fn new(users: U, accounts: A, cards: C, provisioning: P) -> Self {
        Self {
            users,
            accounts,
            cards,
            provisioning,
        }
    }

    /// Execute the register use case
    ///
    /// # Arguments
    /// * `full_name` - Customer's legal name
    /// * `email` - Validated email address, unique across users
    /// * `phone_number` - Validated phone number, unique across users
    /// * `password_hash` - Already-hashed login password
    ///
    /// # Returns
    /// The persisted user. The email-exists precheck is advisory; the
    /// store's unique constraints remain the authority and a concurrent
    /// duplicate still fails the transaction.
    #[tracing::instrument(name = "RegisterUseCase::execute", skip(self, password_hash))]
    pub async fn execute(
        &self,
        full_name: String,
        email: EmailAddress,
        phone_number: PhoneNumber,
        password_hash: String,
    ) -> Result<User, RegisterError> {
        if self.users.email_exists(&email).await? {
            return Err(RegisterError::EmailTaken);
        }

        let account_number = allocate::next_account_number(&self.accounts).await?;
        let card_number = allocate::next_card_number(&self.cards, DEFAULT_BIN).await?;

        let user = User::new(full_name, email, phone_number, password_hash);
        let account = Account::new(account_number, user.id);
        let card = Card::new(card_number, account.id);

        self.provisioning
            .persist_customer(&user, &account, &card)
            .await
            .map_err(|e| match e {
                // Lost a race with a concurrent registration. The unique
                // indexes also cover phone number and the generated account
                // and card numbers; with freshly drawn numbers a conflict
                // here means a duplicate identity, reported as the email.
                EntityStoreError::Conflict => RegisterError::EmailTaken,
                other => RegisterError::EntityStoreError(other),
            })?;

        tracing::info!(account_number = %account.account_number, "customer provisioned");
        Ok(user)
    }
}
