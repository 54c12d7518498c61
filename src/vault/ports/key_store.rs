//! Key persistence port.

use crate::vault::domain::VaultKey;
use std::sync::Arc;
use thiserror::Error;

/// Result type for key store operations.
pub type KeyStoreResult<T> = Result<T, KeyStoreError>;

/// Durable storage for the single vault key.
pub trait KeyStore: Send + Sync {
    /// Loads the persisted key.
    ///
    /// Returns `None` when no key has been stored yet.
    ///
    /// # Errors
    ///
    /// Returns [`KeyStoreError::Malformed`] when stored material cannot be
    /// decoded or [`KeyStoreError::Io`] on storage failure.
    fn load(&self) -> KeyStoreResult<Option<VaultKey>>;

    /// Persists a newly generated key.
    ///
    /// Implementations must never replace an existing key.
    ///
    /// # Errors
    ///
    /// Returns [`KeyStoreError::AlreadyExists`] when a key is already
    /// stored, or [`KeyStoreError::Io`] on storage failure.
    fn create(&self, key: &VaultKey) -> KeyStoreResult<()>;
}

/// Errors returned by key store implementations.
#[derive(Debug, Clone, Error)]
pub enum KeyStoreError {
    /// A key was already persisted; the caller should load it instead.
    #[error("a vault key already exists")]
    AlreadyExists,

    /// Persisted key material could not be decoded.
    #[error("stored vault key is malformed: {0}")]
    Malformed(String),

    /// Storage-layer failure.
    #[error("vault key storage error: {0}")]
    Io(Arc<dyn std::error::Error + Send + Sync>),
}

impl KeyStoreError {
    /// Wraps a storage-layer error.
    pub fn io(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Io(Arc::new(err))
    }
}
