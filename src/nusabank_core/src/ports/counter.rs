use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CounterStoreError {
    #[error("Counter store error: {0}")]
    StoreError(String),
}

/// Ephemeral key-value counter store with per-key expiry.
///
/// Backs the PIN lockout machine. Loss of this store's state only resets
/// lockout posture; it never corrupts durable data. Any backend with an
/// atomic increment and TTL semantics satisfies the contract.
#[async_trait]
pub trait AttemptCounterStore: Send + Sync {
    /// Atomically increment the counter at `key`, creating it at zero
    /// first if absent, and return the post-increment value.
    async fn increment(&self, key: &str) -> Result<i64, CounterStoreError>;

    /// Set or refresh the TTL on an existing key.
    async fn expire(&self, key: &str, ttl: Duration) -> Result<(), CounterStoreError>;

    /// Set `key` to `value` with the given TTL.
    async fn set(&self, key: &str, value: &str, ttl: Duration)
        -> Result<(), CounterStoreError>;

    async fn exists(&self, key: &str) -> Result<bool, CounterStoreError>;

    async fn delete(&self, key: &str) -> Result<(), CounterStoreError>;
}
