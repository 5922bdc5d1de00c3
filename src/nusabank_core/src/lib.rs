pub mod domain;
pub mod ports;

// Re-export commonly used types for convenience
pub use domain::{
    account::{Account, AccountStatus},
    account_number::{AccountNumber, AccountNumberError},
    card::{Card, CardStatus, CardType},
    card_number::{CardNumber, CardNumberError, DEFAULT_BIN},
    email::{EmailAddress, EmailAddressError},
    luhn,
    phone::{PhoneNumber, PhoneNumberError},
    pin::{Pin, PinError},
    user::{KycStatus, User, UserStatus},
};

pub use ports::{
    counter::{AttemptCounterStore, CounterStoreError},
    hasher::{PinHasher, PinHasherError},
    repositories::{
        AccountStore, CardStore, EntityStoreError, ProvisioningStore, UserStore,
    },
};
