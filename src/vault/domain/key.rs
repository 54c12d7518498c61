//! Symmetric vault key.

use super::VaultError;
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use ring::rand::{SecureRandom, SystemRandom};
use std::fmt;

/// Key length in bytes (256-bit ChaCha20-Poly1305 key).
pub const KEY_LEN: usize = 32;

/// Symmetric key used to seal secret detail values.
///
/// The persisted form is the standard base64 encoding of the raw key bytes.
/// `Debug` output never reveals the key.
#[derive(Clone, PartialEq, Eq)]
pub struct VaultKey([u8; KEY_LEN]);

impl VaultKey {
    /// Generates a fresh key from the system random source.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::RandomGeneration`] when the random source fails.
    pub fn generate() -> Result<Self, VaultError> {
        let mut bytes = [0_u8; KEY_LEN];
        SystemRandom::new()
            .fill(&mut bytes)
            .map_err(|_| VaultError::RandomGeneration("vault key"))?;
        Ok(Self(bytes))
    }

    /// Wraps raw key bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Decodes a key from its persisted base64 form.
    ///
    /// Surrounding whitespace is ignored so hand-edited key files with a
    /// trailing newline still load.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::MalformedKey`] when the value is not base64 or
    /// does not decode to exactly [`KEY_LEN`] bytes.
    pub fn decode(encoded: &str) -> Result<Self, VaultError> {
        let raw = BASE64
            .decode(encoded.trim())
            .map_err(|err| VaultError::MalformedKey(err.to_string()))?;
        let bytes: [u8; KEY_LEN] = raw.try_into().map_err(|rejected: Vec<u8>| {
            VaultError::MalformedKey(format!(
                "expected {KEY_LEN} bytes, found {}",
                rejected.len()
            ))
        })?;
        Ok(Self(bytes))
    }

    /// Returns the persisted base64 form of the key.
    #[must_use]
    pub fn encode(&self) -> String {
        BASE64.encode(self.0)
    }

    pub(crate) const fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for VaultKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("VaultKey(..)")
    }
}
