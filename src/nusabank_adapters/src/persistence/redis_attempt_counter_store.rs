use std::sync::Arc;
use std::time::Duration;

use redis::{Commands, Connection};
use nusabank_core::{AttemptCounterStore, CounterStoreError};
use tokio::sync::RwLock;

/// Redis-backed attempt counter store.
///
/// `INCR` gives the atomic create-at-zero-then-increment the lockout
/// machine relies on; TTLs map onto `EXPIRE`/`SETEX`.
#[derive(Clone)]
pub struct RedisAttemptCounterStore {
    conn: Arc<RwLock<Connection>>,
}

impl RedisAttemptCounterStore {
    pub fn new(conn: Arc<RwLock<Connection>>) -> Self {
        Self { conn }
    }
}

#[async_trait::async_trait]
impl AttemptCounterStore for RedisAttemptCounterStore {
    async fn increment(&self, key: &str) -> Result<i64, CounterStoreError> {
        let mut conn = self.conn.write().await;
        conn.incr(key, 1)
            .map_err(|e| CounterStoreError::StoreError(e.to_string()))
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<(), CounterStoreError> {
        let mut conn = self.conn.write().await;
        conn.expire(key, ttl.as_secs() as i64)
            .map_err(|e| CounterStoreError::StoreError(e.to_string()))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CounterStoreError> {
        let mut conn = self.conn.write().await;
        conn.set_ex(key, value, ttl.as_secs())
            .map_err(|e| CounterStoreError::StoreError(e.to_string()))
    }

    async fn exists(&self, key: &str) -> Result<bool, CounterStoreError> {
        let mut conn = self.conn.write().await;
        conn.exists(key)
            .map_err(|e| CounterStoreError::StoreError(e.to_string()))
    }

    async fn delete(&self, key: &str) -> Result<(), CounterStoreError> {
        let mut conn = self.conn.write().await;
        conn.del(key)
            .map_err(|e| CounterStoreError::StoreError(e.to_string()))
    }
}
