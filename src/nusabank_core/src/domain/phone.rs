use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum PhoneNumberError {
    #[error("Invalid phone number")]
    Invalid,
}

/// Phone number: optional leading `+`, then 8 to 15 digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn parse(value: impl Into<String>) -> Result<Self, PhoneNumberError> {
        let value = value.into().trim().to_string();
        let digits = value.strip_prefix('+').unwrap_or(&value);
        if !(8..=15).contains(&digits.len()) || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(PhoneNumberError::Invalid);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = PhoneNumberError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<PhoneNumber> for String {
    fn from(value: PhoneNumber) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_local_and_international_forms() {
        assert!(PhoneNumber::parse("081234567890").is_ok());
        assert!(PhoneNumber::parse("+6281234567890").is_ok());
    }

    #[test]
    fn parse_rejects_malformed_numbers() {
        for bad in ["", "12345", "+", "0812-345-678", "081234567890123456"] {
            assert_eq!(PhoneNumber::parse(bad), Err(PhoneNumberError::Invalid));
        }
    }
}
