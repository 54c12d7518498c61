//! Domain model for the credential vault.

mod error;
mod key;

pub use error::VaultError;
pub use key::{KEY_LEN, VaultKey};
