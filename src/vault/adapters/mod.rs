//! Adapter implementations for vault key storage.

pub mod file;
pub mod memory;

pub use file::FileKeyStore;
pub use memory::InMemoryKeyStore;
