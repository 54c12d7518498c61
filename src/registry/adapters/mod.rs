//! Adapter implementations for registry persistence.

pub mod file;
pub mod memory;

pub use file::JsonFileSnapshotStore;
pub use memory::InMemorySnapshotStore;
