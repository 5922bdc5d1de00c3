use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{email::EmailAddress, phone::PhoneNumber};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KycStatus {
    Pending,
    Verified,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    Active,
    Suspended,
    Closed,
}

/// A registered customer.
///
/// Identity fields are fixed at registration; `kyc_status` and `status`
/// are advanced by later workflows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    pub email: EmailAddress,
    pub phone_number: PhoneNumber,
    pub password_hash: String,
    pub kyc_status: KycStatus,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Build a new user with registration defaults: KYC pending, active.
    pub fn new(
        full_name: String,
        email: EmailAddress,
        phone_number: PhoneNumber,
        password_hash: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            full_name,
            email,
            phone_number,
            password_hash,
            kyc_status: KycStatus::Pending,
            status: UserStatus::Active,
            created_at: Utc::now(),
        }
    }
}
