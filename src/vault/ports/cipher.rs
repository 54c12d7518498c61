//! Narrow sealing interface consumed by the agent store.

use crate::vault::domain::VaultError;

/// Seals and opens secret detail values.
///
/// Implementations must be deterministic in key choice for the lifetime of
/// the value: anything sealed by `encrypt` must be opened by `decrypt` on the
/// same instance.
pub trait SecretCipher: Send + Sync {
    /// Seals a plaintext value into its at-rest form.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError`] when key material is unavailable or sealing
    /// fails.
    fn encrypt(&self, plaintext: &str) -> Result<String, VaultError>;

    /// Opens an at-rest value back into plaintext.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Decryption`] when the value was not produced
    /// under the current key or is corrupt.
    fn decrypt(&self, ciphertext: &str) -> Result<String, VaultError>;
}
