pub mod config;
pub mod hashing;
pub mod persistence;

pub use config::Settings;
pub use hashing::argon2_pin_hasher::Argon2PinHasher;
pub use persistence::{
    in_memory_attempt_counter_store::InMemoryAttemptCounterStore,
    in_memory_bank_store::InMemoryBankStore,
    postgres_bank_store::PostgresBankStore,
    redis_attempt_counter_store::RedisAttemptCounterStore,
};
