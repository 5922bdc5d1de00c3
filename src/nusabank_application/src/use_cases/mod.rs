pub mod allocate;
pub mod issue_card;
pub mod register;
pub mod set_pin;
pub mod verify_pin;
