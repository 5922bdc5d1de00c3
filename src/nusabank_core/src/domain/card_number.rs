use rand::{Rng, TryRngCore, rngs::OsRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::luhn;

/// Standard 16-digit card length.
pub const CARD_NUMBER_LENGTH: usize = 16;

/// Issuer identification number prefixed to every card we issue.
pub const DEFAULT_BIN: &str = "456789";

/// Length of the random segment between the BIN and the check digit.
pub const RANDOM_DIGITS_LENGTH: usize = 9;

#[derive(Debug, Error, PartialEq)]
pub enum CardNumberError {
    #[error("Card number must be exactly 16 digits")]
    InvalidFormat,
    #[error("Card number fails Luhn validation")]
    InvalidCheckDigit,
}

/// A 16-digit, Luhn-valid card number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CardNumber(String);

impl CardNumber {
    /// Parse and validate a card number from storage or input.
    pub fn parse(value: impl Into<String>) -> Result<Self, CardNumberError> {
        let value = value.into();
        if value.len() != CARD_NUMBER_LENGTH || !value.chars().all(|c| c.is_ascii_digit()) {
            return Err(CardNumberError::InvalidFormat);
        }
        if !luhn::is_valid(&value) {
            return Err(CardNumberError::InvalidCheckDigit);
        }
        Ok(Self(value))
    }

    /// Build a random candidate: 6-digit BIN, 9 OS-random digits, then the
    /// Luhn check digit computed over that 15-digit base.
    pub fn random(bin: &str) -> Self {
        debug_assert_eq!(bin.len(), CARD_NUMBER_LENGTH - RANDOM_DIGITS_LENGTH - 1);

        let mut rng = OsRng.unwrap_err();
        let mut base = String::with_capacity(CARD_NUMBER_LENGTH);
        base.push_str(bin);
        for _ in 0..RANDOM_DIGITS_LENGTH {
            let digit: u8 = rng.random_range(0..=9);
            base.push(char::from(b'0' + digit));
        }

        let check = luhn::check_digit(&base);
        base.push(char::from(b'0' + check));
        Self(base)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last four digits, the only part safe to echo back to users.
    pub fn masked(&self) -> String {
        format!("**** **** **** {}", &self.0[CARD_NUMBER_LENGTH - 4..])
    }
}

impl TryFrom<String> for CardNumber {
    type Error = CardNumberError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<CardNumber> for String {
    fn from(value: CardNumber) -> Self {
        value.0
    }
}

impl std::fmt::Display for CardNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.masked())
    }
}
