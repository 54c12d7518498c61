//! Error types for vault key handling and secret sealing.

use crate::vault::ports::KeyStoreError;
use thiserror::Error;

/// Errors returned by vault key handling and secret sealing.
#[derive(Debug, Clone, Error)]
pub enum VaultError {
    /// The system random source could not produce key or nonce material.
    #[error("failed to generate random material: {0}")]
    RandomGeneration(&'static str),

    /// Stored key material does not decode to a valid key.
    #[error("stored vault key is malformed: {0}")]
    MalformedKey(String),

    /// Sealing a secret value failed.
    #[error("failed to encrypt secret value")]
    Encryption,

    /// A sealed value could not be opened with the current key.
    #[error("failed to decrypt secret value: {0}")]
    Decryption(&'static str),

    /// Key storage failed while loading or persisting the key.
    #[error(transparent)]
    KeyStore(#[from] KeyStoreError),
}
