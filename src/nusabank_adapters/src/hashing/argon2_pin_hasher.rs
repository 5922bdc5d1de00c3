use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordVerifier, Version,
    password_hash::{PasswordHasher, SaltString, rand_core},
};
use nusabank_core::{Pin, PinHasher, PinHasherError};

/// Argon2id-backed PIN hasher.
///
/// Hashing and verification are CPU-bound, so both run on the blocking
/// pool with the current span re-entered inside the closure.
#[derive(Default, Clone)]
pub struct Argon2PinHasher;

impl Argon2PinHasher {
    pub fn new() -> Self {
        Self
    }
}

fn hasher() -> Result<Argon2<'static>, PinHasherError> {
    Ok(Argon2::new(
        Algorithm::Argon2id,
        Version::V0x13,
        Params::new(15000, 2, 1, None)
            .map_err(|e| PinHasherError::HashingFailed(e.to_string()))?,
    ))
}

#[async_trait::async_trait]
impl PinHasher for Argon2PinHasher {
    #[tracing::instrument(name = "Computing PIN hash", skip_all)]
    async fn hash(&self, pin: &Pin) -> Result<String, PinHasherError> {
        let pin = pin.clone();
        let current_span = tracing::Span::current();

        tokio::task::spawn_blocking(move || {
            current_span.in_scope(|| {
                let salt = SaltString::generate(rand_core::OsRng);
                hasher()?
                    .hash_password(pin.expose().as_bytes(), &salt)
                    .map(|h| h.to_string())
                    .map_err(|e| PinHasherError::HashingFailed(e.to_string()))
            })
        })
        .await
        .map_err(|e| PinHasherError::HashingFailed(e.to_string()))?
    }

    #[tracing::instrument(name = "Verifying PIN hash", skip_all)]
    async fn matches(&self, pin: &Pin, digest: &str) -> Result<bool, PinHasherError> {
        let pin = pin.clone();
        let digest = digest.to_string();
        let current_span = tracing::Span::current();

        tokio::task::spawn_blocking(move || {
            current_span.in_scope(|| {
                let parsed = PasswordHash::new(&digest)
                    .map_err(|e| PinHasherError::HashingFailed(e.to_string()))?;
                match hasher()?.verify_password(pin.expose().as_bytes(), &parsed) {
                    Ok(()) => Ok(true),
                    Err(argon2::password_hash::Error::Password) => Ok(false),
                    Err(e) => Err(PinHasherError::HashingFailed(e.to_string())),
                }
            })
        })
        .await
        .map_err(|e| PinHasherError::HashingFailed(e.to_string()))?
    }
}
