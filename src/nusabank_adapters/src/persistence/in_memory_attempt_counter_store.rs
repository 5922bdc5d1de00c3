use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use nusabank_core::{AttemptCounterStore, CounterStoreError};
use tokio::sync::RwLock;
use tokio::time::Instant;

struct Entry {
    value: i64,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|deadline| Instant::now() >= deadline)
    }
}

/// In-memory attempt counter store with TTL semantics, for tests.
///
/// Deadlines use `tokio::time::Instant`, so tests running under a paused
/// runtime clock can cross TTLs with `tokio::time::advance`.
#[derive(Default, Clone)]
pub struct InMemoryAttemptCounterStore {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
}

impl InMemoryAttemptCounterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl AttemptCounterStore for InMemoryAttemptCounterStore {
    async fn increment(&self, key: &str) -> Result<i64, CounterStoreError> {
        let mut entries = self.entries.write().await;
        let entry = entries.entry(key.to_string()).or_insert(Entry {
            value: 0,
            expires_at: None,
        });
        if entry.is_expired() {
            entry.value = 0;
            entry.expires_at = None;
        }
        entry.value += 1;
        Ok(entry.value)
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<(), CounterStoreError> {
        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.get_mut(key) {
            if !entry.is_expired() {
                entry.expires_at = Some(Instant::now() + ttl);
            }
        }
        Ok(())
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CounterStoreError> {
        let value: i64 = value.parse().unwrap_or(1);
        self.entries.write().await.insert(
            key.to_string(),
            Entry {
                value,
                expires_at: Some(Instant::now() + ttl),
            },
        );
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, CounterStoreError> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).is_some_and(|entry| !entry.is_expired()))
    }

    async fn delete(&self, key: &str) -> Result<(), CounterStoreError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}
