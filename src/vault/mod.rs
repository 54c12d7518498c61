//! Credential vault for secret agent details.
//!
//! Secret detail values (today only the remote API credential) are sealed
//! with one symmetric key before they reach durable storage. The key is
//! created on first use, persisted through a [`ports::KeyStore`], and held
//! for the lifetime of the vault. It is never rotated in-process: doing so
//! would strand every value sealed under the previous key.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
