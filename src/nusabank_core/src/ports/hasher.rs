use async_trait::async_trait;
use thiserror::Error;

use crate::domain::pin::Pin;

#[derive(Debug, Error)]
pub enum PinHasherError {
    #[error("Hashing failed: {0}")]
    HashingFailed(String),
}

/// One-way hash capability for card PINs.
///
/// Digests are opaque strings; a digest corresponds to exactly one PIN
/// value and there is no recovery path.
#[async_trait]
pub trait PinHasher: Send + Sync {
    async fn hash(&self, pin: &Pin) -> Result<String, PinHasherError>;
    async fn matches(&self, pin: &Pin, digest: &str) -> Result<bool, PinHasherError>;
}
