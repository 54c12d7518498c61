//! Vault services.

mod vault;

pub use vault::CredentialVault;
