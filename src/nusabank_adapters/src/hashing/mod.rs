pub mod argon2_pin_hasher;
