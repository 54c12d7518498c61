//! In-memory key store for tests and ephemeral registries.

use std::sync::{Arc, RwLock};

use crate::vault::{
    domain::VaultKey,
    ports::{KeyStore, KeyStoreError, KeyStoreResult},
};

/// Thread-safe in-memory key store.
///
/// Clones share the same slot, so two vaults built over clones of one store
/// see the same key.
#[derive(Debug, Clone, Default)]
pub struct InMemoryKeyStore {
    slot: Arc<RwLock<Option<VaultKey>>>,
}

impl InMemoryKeyStore {
    /// Creates an empty key store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a key store already holding `key`.
    #[must_use]
    pub fn with_key(key: VaultKey) -> Self {
        Self {
            slot: Arc::new(RwLock::new(Some(key))),
        }
    }

    /// Returns whether a key has been stored.
    ///
    /// # Errors
    ///
    /// Returns [`KeyStoreError::Io`] when lock acquisition fails.
    pub fn has_key(&self) -> KeyStoreResult<bool> {
        Ok(self.load()?.is_some())
    }
}

impl KeyStore for InMemoryKeyStore {
    fn load(&self) -> KeyStoreResult<Option<VaultKey>> {
        let slot = self
            .slot
            .read()
            .map_err(|err| KeyStoreError::io(std::io::Error::other(err.to_string())))?;
        Ok(slot.clone())
    }

    fn create(&self, key: &VaultKey) -> KeyStoreResult<()> {
        let mut slot = self
            .slot
            .write()
            .map_err(|err| KeyStoreError::io(std::io::Error::other(err.to_string())))?;
        if slot.is_some() {
            return Err(KeyStoreError::AlreadyExists);
        }
        *slot = Some(key.clone());
        Ok(())
    }
}
