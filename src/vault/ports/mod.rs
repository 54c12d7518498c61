//! Port contracts for the credential vault.

pub mod cipher;
pub mod key_store;

pub use cipher::SecretCipher;
pub use key_store::{KeyStore, KeyStoreError, KeyStoreResult};
