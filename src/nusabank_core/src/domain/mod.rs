pub mod account;
pub mod account_number;
pub mod card;
pub mod card_number;
pub mod email;
pub mod luhn;
pub mod phone;
pub mod pin;
pub mod user;
