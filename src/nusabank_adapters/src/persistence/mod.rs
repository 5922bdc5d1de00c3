pub mod in_memory_attempt_counter_store;
pub mod in_memory_bank_store;
pub mod postgres_bank_store;
pub mod redis_attempt_counter_store;
