use chrono::{DateTime, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::card_number::CardNumber;

/// Issued cards are valid for four years.
pub const CARD_VALIDITY_MONTHS: u32 = 48;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardType {
    Debit,
    Credit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardStatus {
    Inactive,
    Active,
    Blocked,
}

/// A payment card bound 1:1 to an account.
///
/// `pin_hash` stays empty until the holder completes PIN setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: Uuid,
    pub account_id: Uuid,
    pub card_number: CardNumber,
    pub card_type: CardType,
    pub status: CardStatus,
    pub expiry_date: NaiveDate,
    pub pin_hash: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Card {
    /// Build a new card with issuance defaults: debit, inactive, four-year
    /// validity, no PIN.
    pub fn new(card_number: CardNumber, account_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            account_id,
            card_number,
            card_type: CardType::Debit,
            status: CardStatus::Inactive,
            expiry_date: now.date_naive() + Months::new(CARD_VALIDITY_MONTHS),
            pin_hash: None,
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_card_has_issuance_defaults() {
        let number = CardNumber::parse("4532015112830366").unwrap();
        let card = Card::new(number, Uuid::new_v4());
        assert_eq!(card.card_type, CardType::Debit);
        assert_eq!(card.status, CardStatus::Inactive);
        assert!(card.pin_hash.is_none());
        assert_eq!(
            card.expiry_date,
            Utc::now().date_naive() + Months::new(CARD_VALIDITY_MONTHS)
        );
    }
}
