use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::account_number::AccountNumber;

/// Default settlement currency for newly provisioned accounts.
pub const DEFAULT_CURRENCY: &str = "IDR";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatus {
    Active,
    Inactive,
    Blocked,
}

/// A customer account.
///
/// `version` is the optimistic-concurrency token bumped by the storage
/// layer on every update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub account_number: AccountNumber,
    pub owner_user_id: Uuid,
    pub balance: Decimal,
    pub currency: String,
    pub status: AccountStatus,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Build a new account with provisioning defaults: zero balance, IDR,
    /// active, version 0.
    pub fn new(account_number: AccountNumber, owner_user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            account_number,
            owner_user_id,
            balance: Decimal::ZERO,
            currency: DEFAULT_CURRENCY.to_string(),
            status: AccountStatus::Active,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }
}
