use rand::{Rng, TryRngCore, rngs::OsRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Inclusive range of valid account numbers. Ten digits, no leading zero
/// by construction of the lower bound.
pub const ACCOUNT_NUMBER_MIN: u64 = 1_000_000_000;
pub const ACCOUNT_NUMBER_MAX: u64 = 9_999_999_999;

#[derive(Debug, Error, PartialEq)]
pub enum AccountNumberError {
    #[error("Account number must be exactly 10 digits")]
    InvalidFormat,
    #[error("Account number out of issuable range")]
    OutOfRange,
}

/// A 10-digit account number in `[1000000000, 9999999999]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountNumber(String);

impl AccountNumber {
    /// Parse and validate an account number from storage or input.
    pub fn parse(value: impl Into<String>) -> Result<Self, AccountNumberError> {
        let value = value.into();
        if value.len() != 10 || !value.chars().all(|c| c.is_ascii_digit()) {
            return Err(AccountNumberError::InvalidFormat);
        }
        let numeric: u64 = value
            .parse()
            .map_err(|_| AccountNumberError::InvalidFormat)?;
        if !(ACCOUNT_NUMBER_MIN..=ACCOUNT_NUMBER_MAX).contains(&numeric) {
            return Err(AccountNumberError::OutOfRange);
        }
        Ok(Self(value))
    }

    /// Draw a random candidate uniformly from the issuable range.
    ///
    /// Sources entropy from the operating system rather than a seeded
    /// process-wide generator; `OsRng` is a zero-sized handle and safe to
    /// use from any number of concurrent callers.
    pub fn random() -> Self {
        let numeric = OsRng
            .unwrap_err()
            .random_range(ACCOUNT_NUMBER_MIN..=ACCOUNT_NUMBER_MAX);
        Self(numeric.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AccountNumber {
    type Error = AccountNumberError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<AccountNumber> for String {
    fn from(value: AccountNumber) -> Self {
        value.0
    }
}

impl std::fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
