//! ChaCha20-Poly1305 credential vault with lazily initialised key material.
//!
//! Sealed values are base64-encoded `nonce || ciphertext || tag`. A fresh
//! random nonce is drawn for every seal, so sealing the same plaintext twice
//! yields different ciphertexts.

use std::fmt;
use std::sync::Arc;

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use once_cell::sync::OnceCell;
use ring::aead::{self, Aad, LessSafeKey, Nonce, UnboundKey};
use ring::rand::{SecureRandom, SystemRandom};

use crate::vault::{
    domain::{VaultError, VaultKey},
    ports::{KeyStore, KeyStoreError, SecretCipher},
};

const NONCE_SIZE: usize = aead::NONCE_LEN;

/// Process-wide credential vault.
///
/// The key is resolved on the first `encrypt`/`decrypt` call: loaded from the
/// key store when present, otherwise generated and persisted. After that the
/// same key is used for every call on this instance; there is no rotation.
pub struct CredentialVault<K>
where
    K: KeyStore,
{
    key_store: Arc<K>,
    sealing_key: OnceCell<LessSafeKey>,
    rng: SystemRandom,
}

impl<K> CredentialVault<K>
where
    K: KeyStore,
{
    /// Creates a vault over `key_store`. No key material is touched yet.
    #[must_use]
    pub fn new(key_store: Arc<K>) -> Self {
        Self {
            key_store,
            sealing_key: OnceCell::new(),
            rng: SystemRandom::new(),
        }
    }

    /// Returns whether key material has been resolved.
    #[must_use]
    pub fn is_initialised(&self) -> bool {
        self.sealing_key.get().is_some()
    }

    /// Resolves key material eagerly instead of on first use.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError`] when the key cannot be loaded or created.
    pub fn initialise(&self) -> Result<(), VaultError> {
        self.sealing_key().map(|_| ())
    }

    fn sealing_key(&self) -> Result<&LessSafeKey, VaultError> {
        self.sealing_key.get_or_try_init(|| {
            let key = self.load_or_create_key()?;
            let unbound = UnboundKey::new(&aead::CHACHA20_POLY1305, key.as_bytes())
                .map_err(|_| VaultError::MalformedKey("key rejected by cipher".to_owned()))?;
            Ok(LessSafeKey::new(unbound))
        })
    }

    fn load_or_create_key(&self) -> Result<VaultKey, VaultError> {
        if let Some(key) = self.key_store.load()? {
            tracing::debug!("loaded existing vault key");
            return Ok(key);
        }

        let key = VaultKey::generate()?;
        match self.key_store.create(&key) {
            Ok(()) => {
                tracing::info!("generated new vault key");
                Ok(key)
            }
            Err(KeyStoreError::AlreadyExists) => self.key_store.load()?.ok_or_else(|| {
                VaultError::MalformedKey("key disappeared after concurrent creation".to_owned())
            }),
            Err(err) => Err(err.into()),
        }
    }
}

impl<K> SecretCipher for CredentialVault<K>
where
    K: KeyStore,
{
    fn encrypt(&self, plaintext: &str) -> Result<String, VaultError> {
        if plaintext.is_empty() {
            return Ok(String::new());
        }
        let key = self.sealing_key()?;

        let mut nonce_bytes = [0_u8; NONCE_SIZE];
        self.rng
            .fill(&mut nonce_bytes)
            .map_err(|_| VaultError::RandomGeneration("nonce"))?;
        let nonce = Nonce::assume_unique_for_key(nonce_bytes);

        let mut in_out = plaintext.as_bytes().to_vec();
        key.seal_in_place_append_tag(nonce, Aad::empty(), &mut in_out)
            .map_err(|_| VaultError::Encryption)?;

        let mut sealed = Vec::with_capacity(NONCE_SIZE + in_out.len());
        sealed.extend_from_slice(&nonce_bytes);
        sealed.extend_from_slice(&in_out);
        Ok(BASE64.encode(sealed))
    }

    fn decrypt(&self, ciphertext: &str) -> Result<String, VaultError> {
        if ciphertext.is_empty() {
            return Ok(String::new());
        }
        let key = self.sealing_key()?;

        let sealed = BASE64
            .decode(ciphertext)
            .map_err(|_| VaultError::Decryption("value is not base64"))?;
        if sealed.len() < NONCE_SIZE + aead::CHACHA20_POLY1305.tag_len() {
            return Err(VaultError::Decryption("value is too short"));
        }

        let (nonce_bytes, sealed_body) = sealed.split_at(NONCE_SIZE);
        let nonce = Nonce::try_assume_unique_for_key(nonce_bytes)
            .map_err(|_| VaultError::Decryption("invalid nonce"))?;

        let mut in_out = sealed_body.to_vec();
        let plaintext = key
            .open_in_place(nonce, Aad::empty(), &mut in_out)
            .map_err(|_| VaultError::Decryption("authentication failed"))?;

        String::from_utf8(plaintext.to_vec())
            .map_err(|_| VaultError::Decryption("plaintext is not UTF-8"))
    }
}

impl<K> fmt::Debug for CredentialVault<K>
where
    K: KeyStore,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialVault")
            .field("initialised", &self.is_initialised())
            .finish_non_exhaustive()
    }
}
