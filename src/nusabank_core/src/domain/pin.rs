use secrecy::{ExposeSecret, Secret};
use thiserror::Error;

/// PINs are fixed-length six-digit codes.
pub const PIN_LENGTH: usize = 6;

#[derive(Debug, Error, PartialEq)]
pub enum PinError {
    #[error("PIN must be exactly {PIN_LENGTH} digits")]
    InvalidFormat,
}

/// A submitted PIN in plaintext.
///
/// Wrapped in [`Secret`] so it is redacted from `Debug` output and log
/// spans; the plaintext is only exposed at the hashing boundary.
#[derive(Clone)]
pub struct Pin(Secret<String>);

impl Pin {
    pub fn parse(value: Secret<String>) -> Result<Self, PinError> {
        let raw = value.expose_secret();
        if raw.len() != PIN_LENGTH || !raw.chars().all(|c| c.is_ascii_digit()) {
            return Err(PinError::InvalidFormat);
        }
        Ok(Self(value))
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for Pin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Pin(REDACTED)")
    }
}

impl TryFrom<Secret<String>> for Pin {
    type Error = PinError;

    fn try_from(value: Secret<String>) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}
